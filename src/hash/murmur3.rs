//! MurmurHash3 x64-128.
//!
//! The default hash function. One pass over the input produces 128 bits,
//! which are handed to the filter as two independent 64-bit halves.
//!
//! Output matches the reference `MurmurHash3_x64_128` for the same seed.

use crate::hash::hasher::HashFunction;

const C1: u64 = 0x87c3_7b91_1142_53d5;
const C2: u64 = 0x4cf5_ad43_2745_937f;

/// Seed used by [`Murmur3HashFunction::new`].
pub const DEFAULT_SEED: u64 = 0x7f3a_21ea;

/// MurmurHash3 x64-128 with a fixed seed.
///
/// Not single-valued: [`hash_multiple`](HashFunction::hash_multiple)
/// returns both halves of the 128-bit digest and [`hash`](HashFunction::hash)
/// returns the first half.
///
/// # Examples
///
/// ```
/// use bloomkit::hash::{HashFunction, Murmur3HashFunction};
///
/// let a = Murmur3HashFunction::new();
/// let b = Murmur3HashFunction::with_seed(42);
/// assert_ne!(a.hash(b"key"), b.hash(b"key"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Murmur3HashFunction {
    seed: u64,
}

impl Murmur3HashFunction {
    /// Hasher with [`DEFAULT_SEED`].
    #[must_use]
    pub const fn new() -> Self {
        Self { seed: DEFAULT_SEED }
    }

    /// Hasher with an explicit seed.
    #[must_use]
    pub const fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed in use.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Full 128-bit digest as `(low, high)`.
    #[must_use]
    pub fn hash128(&self, bytes: &[u8]) -> (u64, u64) {
        murmur3_x64_128(bytes, self.seed)
    }
}

impl Default for Murmur3HashFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl HashFunction for Murmur3HashFunction {
    #[inline]
    fn is_single_valued(&self) -> bool {
        false
    }

    #[inline]
    fn hash(&self, bytes: &[u8]) -> u64 {
        self.hash128(bytes).0
    }

    #[inline]
    fn hash_multiple(&self, bytes: &[u8]) -> (u64, u64) {
        self.hash128(bytes)
    }

    fn name(&self) -> &'static str {
        "Murmur3_x64_128"
    }

    fn seed(&self) -> u64 {
        self.seed
    }
}

#[inline]
fn read_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf[..bytes.len()].copy_from_slice(bytes);
    u64::from_le_bytes(buf)
}

#[inline]
fn mix_k1(k1: u64) -> u64 {
    k1.wrapping_mul(C1).rotate_left(31).wrapping_mul(C2)
}

#[inline]
fn mix_k2(k2: u64) -> u64 {
    k2.wrapping_mul(C2).rotate_left(33).wrapping_mul(C1)
}

#[inline]
fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51_afd7_ed55_8ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    k ^ (k >> 33)
}

fn murmur3_x64_128(bytes: &[u8], seed: u64) -> (u64, u64) {
    let mut h1 = seed;
    let mut h2 = seed;

    let mut blocks = bytes.chunks_exact(16);
    for block in &mut blocks {
        let k1 = read_u64(&block[..8]);
        let k2 = read_u64(&block[8..]);

        h1 ^= mix_k1(k1);
        h1 = h1
            .rotate_left(27)
            .wrapping_add(h2)
            .wrapping_mul(5)
            .wrapping_add(0x52dc_e729);

        h2 ^= mix_k2(k2);
        h2 = h2
            .rotate_left(31)
            .wrapping_add(h1)
            .wrapping_mul(5)
            .wrapping_add(0x3849_5ab5);
    }

    let tail = blocks.remainder();
    if tail.len() > 8 {
        h2 ^= mix_k2(read_u64(&tail[8..]));
    }
    if !tail.is_empty() {
        h1 ^= mix_k1(read_u64(&tail[..tail.len().min(8)]));
    }

    let len = bytes.len() as u64;
    h1 ^= len;
    h2 ^= len;
    h1 = h1.wrapping_add(h2);
    h2 = h2.wrapping_add(h1);
    h1 = fmix64(h1);
    h2 = fmix64(h2);
    h1 = h1.wrapping_add(h2);
    h2 = h2.wrapping_add(h1);
    (h1, h2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_vectors() {
        // SMHasher reference values for seed 0.
        let hasher = Murmur3HashFunction::with_seed(0);
        assert_eq!(hasher.hash128(b""), (0, 0));
        assert_eq!(
            hasher.hash128(b"The quick brown fox jumps over the lazy dog"),
            (0xe34b_bc7b_bc07_1b6c, 0x7a43_3ca9_c49a_9347)
        );
    }

    #[test]
    fn test_deterministic() {
        let hasher = Murmur3HashFunction::new();
        assert_eq!(hasher.hash128(b"hello"), hasher.hash128(b"hello"));
    }

    #[test]
    fn test_not_single_valued() {
        let hasher = Murmur3HashFunction::default();
        assert!(!hasher.is_single_valued());
        assert_eq!(hasher.seed(), DEFAULT_SEED);
    }

    #[test]
    fn test_hash_is_first_half() {
        let hasher = Murmur3HashFunction::new();
        let (h1, _) = hasher.hash_multiple(b"payload");
        assert_eq!(hasher.hash(b"payload"), h1);
    }

    #[test]
    fn test_every_tail_length() {
        let data: Vec<u8> = (0u8..40).collect();
        let hasher = Murmur3HashFunction::new();
        let digests: std::collections::HashSet<_> =
            (0..=data.len()).map(|n| hasher.hash128(&data[..n])).collect();
        assert_eq!(digests.len(), data.len() + 1);
    }

    #[test]
    fn test_avalanche_single_bit_flip() {
        let hasher = Murmur3HashFunction::new();
        let a = hasher.hash(b"avalanche-test-00");
        let b = hasher.hash(b"avalanche-test-01");
        let flipped = (a ^ b).count_ones();
        assert!((16..=48).contains(&flipped), "flipped {flipped} bits");
    }
}
