//! Cache keys: identity values for deduplicating postprocessed bitmaps.
//!
//! A [`CacheKey`] is an opaque, combinable identity. Simple keys carry a
//! string namespace (usually derived from a postprocessor's parameters);
//! composite keys aggregate an ordered sequence of member keys and compare
//! equal iff the member sequences are equal in the same order.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use siphasher::sip::SipHasher13;

/// Identity of a postprocessed bitmap, used to deduplicate cached outputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CacheKey {
    /// A single postprocessor's identity.
    Simple(String),
    /// An ordered aggregation of member identities.
    Multi(Vec<CacheKey>),
}

impl CacheKey {
    /// Create a simple key from a string namespace.
    pub fn simple(key: impl Into<String>) -> Self {
        CacheKey::Simple(key.into())
    }

    /// Aggregate an ordered sequence of keys into one composite identity.
    pub fn multi(keys: Vec<CacheKey>) -> Self {
        CacheKey::Multi(keys)
    }

    /// Stable 64-bit digest of this key.
    ///
    /// Uses a zero-keyed SipHash-1-3, so the digest is stable across runs
    /// and processes (unlike `DefaultHasher`) and safe to persist in a
    /// cache index.
    pub fn digest64(&self) -> u64 {
        let mut hasher = SipHasher13::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}
