//! Chaining postprocessors into a single composite operation.
//!
//! [`compose`] turns an ordered sequence of postprocessors into one
//! [`Postprocessor`]: an empty sequence composes to nothing, a single
//! element passes through unchanged, and two or more become a chain that
//! applies each member in order, feeding each stage's output into the next.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use pixelpost_core::chain::compose;
//! use pixelpost_core::ops::blur::GaussianBlurPostprocessor;
//! use pixelpost_core::ops::grayscale::GrayscalePostprocessor;
//! use pixelpost_core::Postprocessor;
//!
//! let stages: Vec<Arc<dyn Postprocessor>> = vec![
//!     Arc::new(GaussianBlurPostprocessor::new(2.0)),
//!     Arc::new(GrayscalePostprocessor::new()),
//! ];
//! let chained = compose(&stages).unwrap();
//! ```
//!
//! # Resource discipline
//!
//! The chain holds at most one intermediate bitmap handle alive at a time
//! besides the one just produced. Spent handles are closed as soon as the
//! next stage's output exists, and handles that go out of scope on an error
//! path are released by drop, so a failing stage never leaks earlier
//! results.

use std::sync::Arc;

use crate::bitmap::{Bitmap, BitmapAllocator, BitmapRef};
use crate::cache_key::CacheKey;
use crate::postprocessor::{PostprocessError, Postprocessor};

/// Compose an ordered sequence of postprocessors into a single one.
///
/// - Empty input returns `None`.
/// - A single element is returned unchanged (the same instance, not a
///   wrapper), avoiding composite overhead.
/// - Two or more elements return a chain over a snapshot of the slice;
///   later changes to the caller's sequence do not affect the chain.
pub fn compose(stages: &[Arc<dyn Postprocessor>]) -> Option<Arc<dyn Postprocessor>> {
    match stages {
        [] => None,
        [single] => Some(Arc::clone(single)),
        _ => Some(Arc::new(PostprocessorChain {
            stages: stages.to_vec(),
        })),
    }
}

/// A composite postprocessor applying its members in sequence order.
///
/// Only built through [`compose`], which guarantees at least two stages.
struct PostprocessorChain {
    stages: Vec<Arc<dyn Postprocessor>>,
}

impl Postprocessor for PostprocessorChain {
    fn name(&self) -> String {
        let names: Vec<String> = self.stages.iter().map(|s| s.name()).collect();
        format!("Chain({})", names.join(","))
    }

    /// Aggregate member keys in processing order.
    ///
    /// First-to-run member first. A cached output is identified by the
    /// sequence of operations that produced it, in the order they ran.
    fn cache_key(&self) -> CacheKey {
        CacheKey::multi(self.stages.iter().map(|s| s.cache_key()).collect())
    }

    fn process(
        &self,
        source: &Bitmap,
        allocator: &dyn BitmapAllocator,
    ) -> Result<BitmapRef, PostprocessError> {
        let mut prev: Option<BitmapRef> = None;
        for stage in &self.stages {
            // First stage reads the caller's source; later stages read the
            // previous stage's output. `prev` is only ever a freshly cloned,
            // unclosed handle, so the fallback never masks a closed one.
            let input = prev.as_ref().and_then(BitmapRef::get).unwrap_or(source);
            let next = stage.process(input, allocator)?;

            // The previous intermediate is no longer needed once the next
            // output exists. On the `?` path above, `prev` is released by
            // drop instead.
            if let Some(mut spent) = prev.take() {
                spent.close();
            }

            // Keep an independently owned clone; the working handle `next`
            // is released when it goes out of scope at the end of this
            // iteration.
            prev = Some(next.clone());
        }

        // `compose` never builds a chain with fewer than two stages, so
        // `prev` is always populated here.
        prev.ok_or(PostprocessError::EmptyChain)
    }
}
