//! XXH3 hash function.
//!
//! Wraps the `xxhash-rust` implementation of XXH3, which picks SIMD paths
//! at runtime where available. XXH3 is single-valued: one 64-bit digest is
//! split into the two base values, so most items cost a single short hash.
//! [`hash_multiple`](HashFunction::hash_multiple) uses the 128-bit variant
//! when callers want two full-width values.
//!
//! # Examples
//!
//! ```
//! # #[cfg(feature = "xxhash")]
//! # {
//! use bloomkit::hash::{HashFunction, XxHashFunction};
//!
//! let hasher = XxHashFunction::new();
//! assert!(hasher.is_single_valued());
//!
//! let seeded = XxHashFunction::with_seed(42);
//! assert_ne!(hasher.hash(b"hello"), seeded.hash(b"hello"));
//! # }
//! ```

use crate::hash::hasher::HashFunction;
use xxhash_rust::xxh3::{xxh3_128_with_seed, xxh3_64_with_seed};

/// XXH3 with a fixed seed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct XxHashFunction {
    seed: u64,
}

impl XxHashFunction {
    /// Hasher with seed 0.
    #[must_use]
    pub const fn new() -> Self {
        Self { seed: 0 }
    }

    /// Hasher with an explicit seed.
    #[must_use]
    pub const fn with_seed(seed: u64) -> Self {
        Self { seed }
    }
}

impl HashFunction for XxHashFunction {
    #[inline]
    fn is_single_valued(&self) -> bool {
        true
    }

    #[inline]
    fn hash(&self, bytes: &[u8]) -> u64 {
        xxh3_64_with_seed(bytes, self.seed)
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn hash_multiple(&self, bytes: &[u8]) -> (u64, u64) {
        let digest = xxh3_128_with_seed(bytes, self.seed);
        (digest as u64, (digest >> 64) as u64)
    }

    fn name(&self) -> &'static str {
        "XXH3"
    }

    fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_bytes_deterministic() {
        let hasher = XxHashFunction::new();
        assert_eq!(hasher.hash(b"hello"), hasher.hash(b"hello"));
        assert_ne!(hasher.hash(b"hello"), hasher.hash(b"world"));
    }

    #[test]
    fn test_different_seeds_different_hashes() {
        let a = XxHashFunction::with_seed(1);
        let b = XxHashFunction::with_seed(2);
        assert_ne!(a.hash(b"test"), b.hash(b"test"));
    }

    #[test]
    fn test_hash_multiple_halves_differ() {
        let (h1, h2) = XxHashFunction::new().hash_multiple(b"pair");
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_no_collisions_sequential_integers() {
        let hasher = XxHashFunction::new();
        let hashes: std::collections::HashSet<u64> = (0u64..10_000)
            .map(|i| hasher.hash(&i.to_be_bytes()))
            .collect();
        assert_eq!(hashes.len(), 10_000);
    }
}
