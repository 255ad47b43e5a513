//! Gaussian blur postprocessor.

use serde::{Deserialize, Serialize};

use crate::bitmap::{Bitmap, BitmapAllocator, BitmapRef};
use crate::cache_key::CacheKey;
use crate::postprocessor::{PostprocessError, Postprocessor};

/// Blurs the bitmap with a Gaussian kernel.
///
/// A non-positive `sigma` degrades to a plain copy rather than an error,
/// so parameter sweeps that include zero compose cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianBlurPostprocessor {
    /// Standard deviation of the Gaussian kernel, in pixels.
    pub sigma: f32,
}

impl GaussianBlurPostprocessor {
    /// Create a blur postprocessor with the given kernel sigma.
    pub fn new(sigma: f32) -> Self {
        Self { sigma }
    }
}

impl Postprocessor for GaussianBlurPostprocessor {
    fn name(&self) -> String {
        format!("GaussianBlur(sigma={})", self.sigma)
    }

    fn cache_key(&self) -> CacheKey {
        CacheKey::simple(format!("gaussian-blur:{}", self.sigma))
    }

    fn process(
        &self,
        source: &Bitmap,
        allocator: &dyn BitmapAllocator,
    ) -> Result<BitmapRef, PostprocessError> {
        if self.sigma <= 0.0 {
            return allocator.create_bitmap(source.clone());
        }

        let img = source.to_rgba_image().ok_or_else(|| {
            PostprocessError::InvalidBitmap("pixel buffer does not match dimensions".to_string())
        })?;
        let blurred = image::imageops::blur(&img, self.sigma);
        allocator.create_bitmap(Bitmap::from_rgba_image(blurred))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::HeapBitmapAllocator;

    fn uniform_bitmap(width: u32, height: u32, value: u8) -> Bitmap {
        Bitmap::from_pixels(
            width,
            height,
            vec![value; width as usize * height as usize * 4],
        )
    }

    #[test]
    fn test_zero_sigma_is_a_copy() {
        let allocator = HeapBitmapAllocator::new();
        let source = uniform_bitmap(6, 6, 90);
        let output = GaussianBlurPostprocessor::new(0.0)
            .process(&source, &allocator)
            .unwrap();
        assert_eq!(*output.get().unwrap(), source);
    }

    #[test]
    fn test_blur_preserves_dimensions() {
        let allocator = HeapBitmapAllocator::new();
        let source = uniform_bitmap(10, 7, 128);
        let output = GaussianBlurPostprocessor::new(2.0)
            .process(&source, &allocator)
            .unwrap();
        let bmp = output.get().unwrap();
        assert_eq!(bmp.width, 10);
        assert_eq!(bmp.height, 7);
    }

    #[test]
    fn test_blur_of_uniform_image_stays_uniform() {
        let allocator = HeapBitmapAllocator::new();
        let source = uniform_bitmap(8, 8, 100);
        let output = GaussianBlurPostprocessor::new(1.5)
            .process(&source, &allocator)
            .unwrap();
        for &byte in &output.get().unwrap().pixels {
            assert!((byte as i32 - 100).abs() <= 1, "got {byte}");
        }
    }

    #[test]
    fn test_blur_smooths_a_hard_edge() {
        // Left half black, right half white; the boundary column should end
        // up strictly between the extremes.
        let mut source = Bitmap::new(8, 4);
        for y in 0..4u32 {
            for x in 0..8u32 {
                let v = if x < 4 { 0 } else { 255 };
                let idx = ((y * 8 + x) * 4) as usize;
                source.pixels[idx] = v;
                source.pixels[idx + 1] = v;
                source.pixels[idx + 2] = v;
                source.pixels[idx + 3] = 255;
            }
        }

        let allocator = HeapBitmapAllocator::new();
        let output = GaussianBlurPostprocessor::new(1.2)
            .process(&source, &allocator)
            .unwrap();
        let bmp = output.get().unwrap();

        // Red channel of pixel (3, 1), just left of the edge.
        let idx = ((8 + 3) * 4) as usize;
        let v = bmp.pixels[idx];
        assert!(v > 0 && v < 255, "edge pixel should be blended, got {v}");
    }

    #[test]
    fn test_blur_rejects_inconsistent_bitmap() {
        let allocator = HeapBitmapAllocator::new();
        let source = Bitmap {
            width: 4,
            height: 4,
            pixels: vec![0u8; 10],
        };
        let result = GaussianBlurPostprocessor::new(1.0).process(&source, &allocator);
        assert!(matches!(result, Err(PostprocessError::InvalidBitmap(_))));
    }
}
