//! Hash function contract consumed by the filter core.
//!
//! Hash functions operate on byte slices. Turning a domain value into bytes
//! is the job of a [`Decomposer`](crate::decompose::Decomposer); turning
//! hash values into bit positions is the job of
//! [`DoubleHashing`](crate::hash::strategies::DoubleHashing).
//!
//! # Single-valued vs. multi-valued
//!
//! A filter needs two base values `(h1, h2)` per item.
//!
//! - A **single-valued** function produces them from one 64-bit
//!   [`hash`](HashFunction::hash): the low and high 32-bit halves.
//! - Otherwise the filter calls [`hash_multiple`](HashFunction::hash_multiple),
//!   which must return two independent 64-bit values.
//!
//! Either way each item costs exactly one hash evaluation.
//!
//! # Examples
//!
//! ```
//! use bloomkit::hash::{HashFunction, Murmur3HashFunction};
//!
//! let hasher = Murmur3HashFunction::new();
//! assert!(!hasher.is_single_valued());
//!
//! let (h1, h2) = hasher.hash_multiple(b"hello world");
//! assert_ne!(h1, h2);
//! assert_eq!(hasher.hash(b"hello world"), h1);
//! ```

use std::fmt;

/// Byte-oriented hash function used by filters.
///
/// Implementations must be stateless and deterministic. The same bytes map
/// to the same values for the lifetime of every filter sharing the
/// function, otherwise set algebra between those filters is meaningless.
pub trait HashFunction: Send + Sync + fmt::Debug {
    /// Whether one [`hash`](Self::hash) call yields enough entropy for both
    /// base values.
    fn is_single_valued(&self) -> bool;

    /// Hash `bytes` to a single 64-bit value.
    fn hash(&self, bytes: &[u8]) -> u64;

    /// Hash `bytes` to two independent 64-bit values.
    fn hash_multiple(&self, bytes: &[u8]) -> (u64, u64);

    /// Short algorithm name, for diagnostics.
    fn name(&self) -> &'static str;

    /// Seed mixed into every hash.
    ///
    /// Two filters hash bytes identically iff their functions agree on both
    /// [`name`](Self::name) and seed.
    fn seed(&self) -> u64 {
        0
    }
}
