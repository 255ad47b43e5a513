//! Brightness adjustment postprocessor.
//!
//! Exposure is measured in stops: each stop doubles or halves the
//! brightness (`output = input * 2^exposure`). Alpha is never touched.

use serde::{Deserialize, Serialize};

use crate::bitmap::{Bitmap, BitmapAllocator, BitmapRef, BYTES_PER_PIXEL};
use crate::cache_key::CacheKey;
use crate::postprocessor::{PostprocessError, Postprocessor};

/// Scales RGB channels by `2^exposure`, clamping to the displayable range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BrightnessPostprocessor {
    /// Exposure adjustment in stops (typically -5 to +5).
    pub exposure: f32,
}

impl BrightnessPostprocessor {
    /// Create a brightness postprocessor with the given exposure in stops.
    pub fn new(exposure: f32) -> Self {
        Self { exposure }
    }
}

impl Postprocessor for BrightnessPostprocessor {
    fn name(&self) -> String {
        format!("Brightness(exposure={})", self.exposure)
    }

    fn cache_key(&self) -> CacheKey {
        CacheKey::simple(format!("brightness:{}", self.exposure))
    }

    fn process(
        &self,
        source: &Bitmap,
        allocator: &dyn BitmapAllocator,
    ) -> Result<BitmapRef, PostprocessError> {
        let mut output = source.clone();
        if self.exposure != 0.0 {
            let multiplier = 2.0_f32.powf(self.exposure);
            for pixel in output.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
                for channel in &mut pixel[..3] {
                    *channel = (*channel as f32 * multiplier).clamp(0.0, 255.0).round() as u8;
                }
            }
        }
        allocator.create_bitmap(output)
    }
}
