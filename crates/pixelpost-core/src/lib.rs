//! Pixelpost Core - Bitmap postprocessing library
//!
//! This crate provides composable bitmap postprocessors: named,
//! cache-key-bearing image operations that can be chained into a single
//! operation with [`chain::compose`]. Bitmaps flow between stages as
//! reference-counted [`BitmapRef`] handles with explicit close semantics,
//! so intermediate results are released deterministically and never leak,
//! even when a stage fails mid-chain.
//!
//! A stock set of postprocessors (grayscale, blur, brightness, rounded
//! corners, resize) lives in [`ops`]; hosts plug in their own by
//! implementing [`Postprocessor`].

pub mod bitmap;
pub mod cache_key;
pub mod chain;
pub mod ops;
pub mod postprocessor;

pub use bitmap::{Bitmap, BitmapAllocator, BitmapRef, HeapBitmapAllocator};
pub use cache_key::CacheKey;
pub use chain::compose;
pub use postprocessor::{PostprocessError, Postprocessor};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::ops::brightness::BrightnessPostprocessor;
    use crate::ops::grayscale::GrayscalePostprocessor;

    #[test]
    fn test_end_to_end_chain_with_stock_ops() {
        let stages: Vec<Arc<dyn Postprocessor>> = vec![
            Arc::new(GrayscalePostprocessor::new()),
            Arc::new(BrightnessPostprocessor::new(1.0)),
        ];
        let chained = compose(&stages).unwrap();
        assert_eq!(chained.name(), "Chain(Grayscale,Brightness(exposure=1))");

        let allocator = HeapBitmapAllocator::new();
        let source = Bitmap::from_pixels(2, 1, vec![60, 60, 60, 255, 0, 0, 0, 255]);
        let output = chained.process(&source, &allocator).unwrap();
        let bmp = output.get().unwrap();

        // Gray 60 brightened one stop is 120; black stays black.
        assert_eq!(&bmp.pixels[..4], &[120, 120, 120, 255]);
        assert_eq!(&bmp.pixels[4..], &[0, 0, 0, 255]);
    }

    #[test]
    fn test_chain_cache_key_distinguishes_order() {
        let gray: Arc<dyn Postprocessor> = Arc::new(GrayscalePostprocessor::new());
        let bright: Arc<dyn Postprocessor> = Arc::new(BrightnessPostprocessor::new(0.5));

        let forward = compose(&[Arc::clone(&gray), Arc::clone(&bright)]).unwrap();
        let backward = compose(&[bright, gray]).unwrap();
        assert_ne!(forward.cache_key(), backward.cache_key());
        assert_ne!(
            forward.cache_key().digest64(),
            backward.cache_key().digest64()
        );
    }
}
