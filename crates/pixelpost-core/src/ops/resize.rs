//! Resampling postprocessor.

use serde::{Deserialize, Serialize};

use crate::bitmap::{Bitmap, BitmapAllocator, BitmapRef};
use crate::cache_key::CacheKey;
use crate::postprocessor::{PostprocessError, Postprocessor};

/// Filter type for resampling operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }

    /// Stable token for cache-key construction.
    fn as_str(self) -> &'static str {
        match self {
            FilterType::Nearest => "nearest",
            FilterType::Bilinear => "bilinear",
            FilterType::Lanczos3 => "lanczos3",
        }
    }
}

/// Resamples the bitmap to fixed target dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizePostprocessor {
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
    /// Resampling filter.
    pub filter: FilterType,
}

impl ResizePostprocessor {
    /// Create a resize postprocessor with the default (bilinear) filter.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            filter: FilterType::default(),
        }
    }

    /// Create a resize postprocessor with an explicit filter.
    pub fn with_filter(width: u32, height: u32, filter: FilterType) -> Self {
        Self {
            width,
            height,
            filter,
        }
    }
}

impl Postprocessor for ResizePostprocessor {
    fn name(&self) -> String {
        format!("Resize({}x{})", self.width, self.height)
    }

    fn cache_key(&self) -> CacheKey {
        CacheKey::simple(format!(
            "resize:{}x{}:{}",
            self.width,
            self.height,
            self.filter.as_str()
        ))
    }

    fn process(
        &self,
        source: &Bitmap,
        allocator: &dyn BitmapAllocator,
    ) -> Result<BitmapRef, PostprocessError> {
        if self.width == 0 || self.height == 0 {
            return Err(PostprocessError::AllocationFailed {
                width: self.width,
                height: self.height,
            });
        }

        let img = source.to_rgba_image().ok_or_else(|| {
            PostprocessError::InvalidBitmap("pixel buffer does not match dimensions".to_string())
        })?;
        let resized =
            image::imageops::resize(&img, self.width, self.height, self.filter.to_image_filter());
        allocator.create_bitmap(Bitmap::from_rgba_image(resized))
    }
}
