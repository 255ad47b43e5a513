//! The postprocessor capability and its error type.
//!
//! A postprocessor is a named, cache-key-bearing, single-input/single-output
//! bitmap operation. Implementations are effectively immutable: constructed
//! once, invoked many times, with no mutable state persisting across
//! `process` calls. That makes a shared postprocessor safe to invoke
//! concurrently from multiple threads on different source bitmaps.

use thiserror::Error;

use crate::bitmap::{Bitmap, BitmapAllocator, BitmapRef};
use crate::cache_key::CacheKey;

/// Error type for postprocessing operations.
#[derive(Debug, Error)]
pub enum PostprocessError {
    /// The allocator rejected a bitmap of the given dimensions.
    #[error("bitmap allocation failed for {width}x{height} bitmap")]
    AllocationFailed {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// A bitmap's pixel buffer is malformed or unusable.
    #[error("invalid bitmap: {0}")]
    InvalidBitmap(String),

    /// A postprocessor chain was invoked with no stages.
    ///
    /// Unreachable through [`compose`](crate::chain::compose), which never
    /// builds a chain with fewer than two stages.
    #[error("postprocessor chain has no stages")]
    EmptyChain,
}

/// A single bitmap-to-bitmap postprocessing operation.
///
/// The source bitmap and allocator are borrowed for the duration of one
/// `process` call and must not be retained. Each call produces a freshly
/// owned [`BitmapRef`] which the caller is responsible for releasing
/// (explicitly or by dropping).
pub trait Postprocessor: Send + Sync {
    /// Human-readable identifier, used for diagnostics and cache
    /// namespacing.
    fn name(&self) -> String;

    /// Identity of this operation's output, used to deduplicate cached
    /// results. Two postprocessors with equal cache keys must produce
    /// pixel-identical output for the same source.
    fn cache_key(&self) -> CacheKey;

    /// Produce a new owned bitmap derived from `source`.
    ///
    /// # Errors
    ///
    /// Propagates allocation failures and malformed-bitmap errors from the
    /// allocator or the operation itself.
    fn process(
        &self,
        source: &Bitmap,
        allocator: &dyn BitmapAllocator,
    ) -> Result<BitmapRef, PostprocessError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PostprocessError::AllocationFailed {
            width: 100,
            height: 50,
        };
        assert_eq!(err.to_string(), "bitmap allocation failed for 100x50 bitmap");

        let err = PostprocessError::InvalidBitmap("truncated buffer".to_string());
        assert_eq!(err.to_string(), "invalid bitmap: truncated buffer");
    }
}
