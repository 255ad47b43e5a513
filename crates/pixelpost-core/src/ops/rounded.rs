//! Rounded-corner masking postprocessor.
//!
//! Zeroes the alpha channel of pixels lying outside a quarter-circle in
//! each corner, producing the rounded-rectangle silhouette host UIs use
//! for avatars and cards. Color channels are left untouched.

use serde::{Deserialize, Serialize};

use crate::bitmap::{Bitmap, BitmapAllocator, BitmapRef, BYTES_PER_PIXEL};
use crate::cache_key::CacheKey;
use crate::postprocessor::{PostprocessError, Postprocessor};

/// Masks the bitmap's corners to a circular arc of the given radius.
///
/// The radius is clamped to half the shorter side; a radius of 0 is the
/// identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundedCornersPostprocessor {
    /// Corner radius in pixels.
    pub radius: u32,
}

impl RoundedCornersPostprocessor {
    /// Create a rounded-corners postprocessor with the given radius.
    pub fn new(radius: u32) -> Self {
        Self { radius }
    }
}

/// Whether the pixel at (x, y) falls outside the rounded silhouette.
///
/// Pixel centers are compared against circle centers sitting `radius`
/// pixels inside each corner.
fn outside_corner(x: u32, y: u32, width: u32, height: u32, radius: f64) -> bool {
    let px = x as f64 + 0.5;
    let py = y as f64 + 0.5;
    let w = width as f64;
    let h = height as f64;

    let cx = if px < radius {
        radius
    } else if px > w - radius {
        w - radius
    } else {
        return false;
    };
    let cy = if py < radius {
        radius
    } else if py > h - radius {
        h - radius
    } else {
        return false;
    };

    let dx = px - cx;
    let dy = py - cy;
    dx * dx + dy * dy > radius * radius
}

impl Postprocessor for RoundedCornersPostprocessor {
    fn name(&self) -> String {
        format!("RoundedCorners(radius={})", self.radius)
    }

    fn cache_key(&self) -> CacheKey {
        CacheKey::simple(format!("rounded-corners:{}", self.radius))
    }

    fn process(
        &self,
        source: &Bitmap,
        allocator: &dyn BitmapAllocator,
    ) -> Result<BitmapRef, PostprocessError> {
        let mut output = source.clone();
        let radius = f64::from(self.radius.min(source.width.min(source.height) / 2));
        if radius > 0.0 {
            for y in 0..output.height {
                for x in 0..output.width {
                    if outside_corner(x, y, output.width, output.height, radius) {
                        let idx =
                            (y as usize * output.width as usize + x as usize) * BYTES_PER_PIXEL;
                        output.pixels[idx + 3] = 0;
                    }
                }
            }
        }
        allocator.create_bitmap(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::HeapBitmapAllocator;

    fn opaque_bitmap(width: u32, height: u32) -> Bitmap {
        Bitmap::from_pixels(
            width,
            height,
            vec![200u8; width as usize * height as usize * 4],
        )
    }

    fn alpha_at(bmp: &Bitmap, x: u32, y: u32) -> u8 {
        bmp.pixels[(y as usize * bmp.width as usize + x as usize) * 4 + 3]
    }

    fn apply(radius: u32, source: &Bitmap) -> Bitmap {
        let allocator = HeapBitmapAllocator::new();
        let handle = RoundedCornersPostprocessor::new(radius)
            .process(source, &allocator)
            .unwrap();
        handle.get().unwrap().clone()
    }

    #[test]
    fn test_zero_radius_is_identity() {
        let source = opaque_bitmap(10, 10);
        assert_eq!(apply(0, &source), source);
    }

    #[test]
    fn test_corner_pixels_become_transparent() {
        let source = opaque_bitmap(20, 20);
        let output = apply(6, &source);
        assert_eq!(alpha_at(&output, 0, 0), 0);
        assert_eq!(alpha_at(&output, 19, 0), 0);
        assert_eq!(alpha_at(&output, 0, 19), 0);
        assert_eq!(alpha_at(&output, 19, 19), 0);
    }

    #[test]
    fn test_center_and_edges_stay_opaque() {
        let source = opaque_bitmap(20, 20);
        let output = apply(6, &source);
        assert_eq!(alpha_at(&output, 10, 10), 200);
        // Edge midpoints are outside every corner region.
        assert_eq!(alpha_at(&output, 10, 0), 200);
        assert_eq!(alpha_at(&output, 0, 10), 200);
    }

    #[test]
    fn test_color_channels_unchanged() {
        let source = opaque_bitmap(12, 12);
        let output = apply(4, &source);
        for pixel in output.pixels.chunks_exact(4) {
            assert_eq!(&pixel[..3], &[200, 200, 200]);
        }
    }

    #[test]
    fn test_oversized_radius_is_clamped() {
        // Radius far beyond the bitmap still behaves like half the short
        // side rather than erasing everything.
        let source = opaque_bitmap(10, 10);
        let output = apply(1000, &source);
        assert_eq!(alpha_at(&output, 5, 5), 200);
        assert_eq!(alpha_at(&output, 0, 0), 0);
    }
}
