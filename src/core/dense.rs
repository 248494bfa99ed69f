//! Dense bit array backed by 64-bit words.
//!
//! Bits are packed little-endian within each word:
//!
//! ```text
//! Word 0: [bit 0][bit 1]...[bit 63]
//! Word 1: [bit 64][bit 65]...[bit 127]
//! ```
//!
//! Space is `⌈n/64⌉ × 8` bytes regardless of how many bits are set. Point
//! operations are a shift, a mask and one word access.
//!
//! # Examples
//!
//! ```
//! use bloomkit::core::bitarray::BitArray;
//! use bloomkit::core::dense::DenseBitArray;
//!
//! let mut a = DenseBitArray::new(128).unwrap();
//! let mut b = DenseBitArray::new(128).unwrap();
//! a.set(10);
//! b.set(20);
//!
//! a.or(&b).unwrap();
//! assert!(a.get(10) && a.get(20));
//! assert_eq!(a.count_ones(), 2);
//! ```

use crate::core::bitarray::{ensure_same_size, BitArray};
use crate::error::{BloomError, Result};

const WORD_BITS: usize = 64;

#[inline]
const fn locate(index: usize) -> (usize, u64) {
    (index / WORD_BITS, 1u64 << (index % WORD_BITS))
}

/// Fixed-size bit vector stored as `Box<[u64]>`.
///
/// Bits past `len` in the last word are always zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseBitArray {
    words: Box<[u64]>,
    len: usize,
}

impl DenseBitArray {
    /// Create an all-zero array of `num_bits` bits.
    ///
    /// # Errors
    ///
    /// [`BloomError::InvalidFilterSize`] if `num_bits` is 0.
    pub fn new(num_bits: usize) -> Result<Self> {
        if num_bits == 0 {
            return Err(BloomError::invalid_filter_size(num_bits, usize::MAX));
        }

        let num_words = num_bits.div_ceil(WORD_BITS);
        Ok(Self {
            words: vec![0u64; num_words].into_boxed_slice(),
            len: num_bits,
        })
    }

    /// Rebuild an array from raw words, as produced by [`Self::words`].
    ///
    /// # Errors
    ///
    /// - [`BloomError::InvalidFilterSize`] if `len` is 0
    /// - [`BloomError::InvalidParameters`] if the word count does not match `len`,
    ///   or a bit past `len` is set
    pub fn from_words(words: Vec<u64>, len: usize) -> Result<Self> {
        if len == 0 {
            return Err(BloomError::invalid_filter_size(len, usize::MAX));
        }

        let required = len.div_ceil(WORD_BITS);
        if words.len() != required {
            return Err(BloomError::invalid_parameters(format!(
                "need {} words for {} bits, got {}",
                required,
                len,
                words.len()
            )));
        }

        let tail_bits = len % WORD_BITS;
        if tail_bits != 0 {
            let spill = words[required - 1] >> tail_bits;
            if spill != 0 {
                return Err(BloomError::invalid_parameters(format!(
                    "bits set beyond length {}",
                    len
                )));
            }
        }

        Ok(Self {
            words: words.into_boxed_slice(),
            len,
        })
    }

    /// Underlying words.
    #[must_use]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Indices of set bits, ascending.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(word_idx, &word)| {
            let mut remaining = word;
            std::iter::from_fn(move || {
                if remaining == 0 {
                    return None;
                }
                let bit = remaining.trailing_zeros() as usize;
                remaining &= remaining - 1;
                Some(word_idx * WORD_BITS + bit)
            })
        })
    }

    #[inline]
    fn check(&self, index: usize) {
        assert!(
            index < self.len,
            "DenseBitArray index out of bounds: index={} len={}",
            index,
            self.len
        );
    }
}

impl BitArray for DenseBitArray {
    #[inline]
    fn get(&self, index: usize) -> bool {
        self.check(index);
        let (word, mask) = locate(index);
        self.words[word] & mask != 0
    }

    #[inline]
    fn set(&mut self, index: usize) -> bool {
        self.check(index);
        let (word, mask) = locate(index);
        let previous = self.words[word];
        self.words[word] = previous | mask;
        previous & mask == 0
    }

    #[inline]
    fn clear(&mut self, index: usize) {
        self.check(index);
        let (word, mask) = locate(index);
        self.words[word] &= !mask;
    }

    fn clear_all(&mut self) {
        self.words.fill(0);
    }

    fn or(&mut self, other: &Self) -> Result<()> {
        ensure_same_size("or", self.len, other.len)?;
        for (lhs, rhs) in self.words.iter_mut().zip(other.words.iter()) {
            *lhs |= *rhs;
        }
        Ok(())
    }

    fn and(&mut self, other: &Self) -> Result<()> {
        ensure_same_size("and", self.len, other.len)?;
        for (lhs, rhs) in self.words.iter_mut().zip(other.words.iter()) {
            *lhs &= *rhs;
        }
        Ok(())
    }

    fn is_subset_of(&self, other: &Self) -> bool {
        self.len == other.len
            && self
                .words
                .iter()
                .zip(other.words.iter())
                .all(|(lhs, rhs)| lhs & !rhs == 0)
    }

    #[inline]
    fn bit_size(&self) -> usize {
        self.len
    }

    fn count_ones(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    fn memory_usage(&self) -> usize {
        self.words.len() * std::mem::size_of::<u64>() + std::mem::size_of::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let bits = DenseBitArray::new(100).unwrap();
        assert_eq!(bits.bit_size(), 100);
        assert_eq!(bits.words().len(), 2);
        assert_eq!(bits.count_ones(), 0);
    }

    #[test]
    fn test_new_zero_bits_error() {
        assert!(DenseBitArray::new(0).is_err());
    }

    #[test]
    fn test_set_reports_transition() {
        let mut bits = DenseBitArray::new(64).unwrap();
        assert!(bits.set(10));
        assert!(!bits.set(10));
        assert!(bits.get(10));
        assert!(!bits.get(11));
    }

    #[test]
    fn test_clear_and_clear_all() {
        let mut bits = DenseBitArray::new(200).unwrap();
        bits.set(0);
        bits.set(64);
        bits.set(199);
        bits.clear(64);
        assert!(!bits.get(64));
        assert_eq!(bits.count_ones(), 2);

        bits.clear_all();
        assert_eq!(bits.count_ones(), 0);
    }

    #[test]
    fn test_boundary_conditions() {
        let mut bits = DenseBitArray::new(65).unwrap();
        bits.set(63);
        bits.set(64);
        assert!(bits.get(63));
        assert!(bits.get(64));
        assert_eq!(bits.iter_ones().collect::<Vec<_>>(), vec![63, 64]);
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_set_out_of_bounds() {
        let mut bits = DenseBitArray::new(64).unwrap();
        bits.set(64);
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_get_out_of_bounds() {
        let bits = DenseBitArray::new(10).unwrap();
        let _ = bits.get(10);
    }

    #[test]
    fn test_or_and() {
        let mut a = DenseBitArray::new(128).unwrap();
        let mut b = DenseBitArray::new(128).unwrap();
        a.set(1);
        a.set(100);
        b.set(100);
        b.set(127);

        let mut union = a.clone();
        union.or(&b).unwrap();
        assert_eq!(union.iter_ones().collect::<Vec<_>>(), vec![1, 100, 127]);

        a.and(&b).unwrap();
        assert_eq!(a.iter_ones().collect::<Vec<_>>(), vec![100]);
    }

    #[test]
    fn test_size_mismatch_leaves_receiver_unchanged() {
        let mut a = DenseBitArray::new(64).unwrap();
        let mut b = DenseBitArray::new(128).unwrap();
        a.set(5);
        b.set(6);
        let before = a.clone();

        assert!(a.or(&b).is_err());
        assert!(a.and(&b).is_err());
        assert_eq!(a, before);
    }

    #[test]
    fn test_is_subset_of() {
        let mut a = DenseBitArray::new(300).unwrap();
        let mut b = DenseBitArray::new(300).unwrap();
        a.set(7);
        b.set(7);
        b.set(250);

        assert!(a.is_subset_of(&b));
        assert!(!b.is_subset_of(&a));
        assert!(a.is_subset_of(&a));
    }

    #[test]
    fn test_from_words_round_trip() {
        let mut bits = DenseBitArray::new(130).unwrap();
        bits.set(5);
        bits.set(129);

        let restored = DenseBitArray::from_words(bits.words().to_vec(), 130).unwrap();
        assert_eq!(restored, bits);
    }

    #[test]
    fn test_from_words_validation() {
        assert!(DenseBitArray::from_words(vec![0], 0).is_err());
        assert!(DenseBitArray::from_words(vec![0], 65).is_err());
        // Bit 10 set in a 10-bit array.
        assert!(DenseBitArray::from_words(vec![1 << 10], 10).is_err());
    }

    #[test]
    fn test_memory_usage() {
        let bits = DenseBitArray::new(1000).unwrap();
        assert!(bits.memory_usage() >= 16 * 8);
    }
}
