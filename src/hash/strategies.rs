//! Bit index generation by double hashing.
//!
//! For k hash functions derived from two base values h₁ and h₂
//! (Kirsch & Mitzenmacher 2006):
//!
//! ```text
//! gᵢ(x) = norm(h₁(x) + i·h₂(x)) mod m        for i in 0..k
//! ```
//!
//! Arithmetic is wrapping signed 64-bit. `norm` maps a negative sum to its
//! bitwise complement, which is non-negative and keeps the distribution
//! uniform. The k positions cost at most one hash evaluation per item, with
//! a negligible loss of independence against k separate hashes.

#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use crate::hash::hasher::HashFunction;

/// Double hashing index generator.
///
/// # Examples
///
/// ```
/// use bloomkit::hash::{DoubleHashing, Murmur3HashFunction};
///
/// let hasher = Murmur3HashFunction::new();
/// let (h1, h2) = DoubleHashing::base_pair(&hasher, b"hello");
/// let indices = DoubleHashing::generate_indices(h1, h2, 7, 1000);
///
/// assert_eq!(indices.len(), 7);
/// assert!(indices.iter().all(|&i| i < 1000));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleHashing;

impl DoubleHashing {
    /// Base values `(h1, h2)` for `bytes`.
    ///
    /// A single-valued hasher is called once through `hash` and its digest
    /// is split into sign-extended low and high 32-bit halves. Any other
    /// hasher is called once through `hash_multiple`.
    #[inline]
    pub fn base_pair<H>(hasher: &H, bytes: &[u8]) -> (i64, i64)
    where
        H: HashFunction + ?Sized,
    {
        if hasher.is_single_valued() {
            let digest = hasher.hash(bytes);
            let low = i64::from(digest as u32 as i32);
            let high = i64::from((digest >> 32) as u32 as i32);
            (low, high)
        } else {
            let (h1, h2) = hasher.hash_multiple(bytes);
            (h1 as i64, h2 as i64)
        }
    }

    /// Lazily yield the `k` bit positions in `[0, m)`.
    ///
    /// `m` must be positive.
    #[inline]
    pub fn indices(h1: i64, h2: i64, k: usize, m: usize) -> impl Iterator<Item = usize> {
        debug_assert!(m > 0, "bit count must be positive");
        let m = m as u64;
        (0..k).map(move |i| {
            let combined = h1.wrapping_add((i as i64).wrapping_mul(h2));
            let positive = if combined < 0 { !combined } else { combined };
            (positive as u64 % m) as usize
        })
    }

    /// Collect the `k` bit positions into a vector.
    #[must_use]
    pub fn generate_indices(h1: i64, h2: i64, k: usize, m: usize) -> Vec<usize> {
        Self::indices(h1, h2, k, m).collect()
    }
}
