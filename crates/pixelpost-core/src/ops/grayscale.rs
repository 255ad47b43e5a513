//! Grayscale conversion using ITU-R BT.709 luminance coefficients.

use serde::{Deserialize, Serialize};

use crate::bitmap::{Bitmap, BitmapAllocator, BitmapRef, BYTES_PER_PIXEL};
use crate::cache_key::CacheKey;
use crate::postprocessor::{PostprocessError, Postprocessor};

/// ITU-R BT.709 coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.2126;

/// ITU-R BT.709 coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.7152;

/// ITU-R BT.709 coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.0722;

/// Perceptual luminance of an RGB pixel (0-255 per channel).
#[inline]
fn luminance_u8(r: u8, g: u8, b: u8) -> u8 {
    let lum = LUMINANCE_R * r as f32 + LUMINANCE_G * g as f32 + LUMINANCE_B * b as f32;
    lum.clamp(0.0, 255.0).round() as u8
}

/// Converts every pixel to its perceptual gray value. Alpha is preserved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrayscalePostprocessor;

impl GrayscalePostprocessor {
    /// Create a grayscale postprocessor.
    pub fn new() -> Self {
        Self
    }
}

impl Postprocessor for GrayscalePostprocessor {
    fn name(&self) -> String {
        "Grayscale".to_string()
    }

    fn cache_key(&self) -> CacheKey {
        CacheKey::simple("grayscale")
    }

    fn process(
        &self,
        source: &Bitmap,
        allocator: &dyn BitmapAllocator,
    ) -> Result<BitmapRef, PostprocessError> {
        let mut output = source.clone();
        for pixel in output.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            let lum = luminance_u8(pixel[0], pixel[1], pixel[2]);
            pixel[0] = lum;
            pixel[1] = lum;
            pixel[2] = lum;
        }
        allocator.create_bitmap(output)
    }
}
