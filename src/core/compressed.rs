//! Compressed bit array backed by a roaring bitmap.
//!
//! Roaring bitmaps split the 32-bit index space into 2¹⁶-bit chunks and
//! store each chunk as a sorted array, a bitmap or a run list, whichever is
//! smallest. A filter with a very large `m` and few insertions therefore
//! pays for the bits it sets rather than for `m`.
//!
//! The logical size is tracked separately: the bitmap itself is unbounded,
//! but every access is checked against `len` exactly like the dense backend.

use crate::core::bitarray::{ensure_same_size, BitArray};
use crate::error::{BloomError, Result};
use roaring::RoaringBitmap;

/// Fixed-size bit vector stored as a [`RoaringBitmap`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedBitArray {
    bitmap: RoaringBitmap,
    len: usize,
}

impl CompressedBitArray {
    /// Largest addressable size: the full `u32` index space.
    pub const MAX_BITS: usize = (u32::MAX as usize).saturating_add(1);

    /// Create an empty array of `num_bits` bits.
    ///
    /// # Errors
    ///
    /// [`BloomError::InvalidFilterSize`] if `num_bits` is 0 or above [`Self::MAX_BITS`].
    pub fn new(num_bits: usize) -> Result<Self> {
        if num_bits == 0 || num_bits > Self::MAX_BITS {
            return Err(BloomError::invalid_filter_size(num_bits, Self::MAX_BITS));
        }

        Ok(Self {
            bitmap: RoaringBitmap::new(),
            len: num_bits,
        })
    }

    /// Wrap an existing bitmap as an array of `len` bits.
    ///
    /// # Errors
    ///
    /// - [`BloomError::InvalidFilterSize`] if `len` is out of range
    /// - [`BloomError::InvalidParameters`] if the bitmap holds an index `>= len`
    pub fn from_bitmap(bitmap: RoaringBitmap, len: usize) -> Result<Self> {
        let mut bits = Self::new(len)?;
        if let Some(max) = bitmap.max() {
            if max as usize >= len {
                return Err(BloomError::invalid_parameters(format!(
                    "bitmap index {} beyond length {}",
                    max, len
                )));
            }
        }
        bits.bitmap = bitmap;
        Ok(bits)
    }

    /// Decode an array from the roaring portable format.
    ///
    /// # Errors
    ///
    /// [`BloomError::Io`] if the bytes are not a valid bitmap, plus the
    /// conditions of [`Self::from_bitmap`].
    pub fn from_portable_bytes(bytes: &[u8], len: usize) -> Result<Self> {
        let bitmap = RoaringBitmap::deserialize_from(bytes)?;
        Self::from_bitmap(bitmap, len)
    }

    /// Encode the bitmap in the roaring portable format.
    ///
    /// # Errors
    ///
    /// [`BloomError::Io`] if the encoder fails.
    pub fn to_portable_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.bitmap.serialized_size());
        self.bitmap.serialize_into(&mut out)?;
        Ok(out)
    }

    /// Underlying bitmap.
    #[must_use]
    pub fn bitmap(&self) -> &RoaringBitmap {
        &self.bitmap
    }

    /// Indices of set bits, ascending.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bitmap.iter().map(|index| index as usize)
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn key(&self, index: usize) -> u32 {
        assert!(
            index < self.len,
            "CompressedBitArray index out of bounds: index={} len={}",
            index,
            self.len
        );
        // len <= MAX_BITS keeps every valid index inside u32.
        index as u32
    }
}

impl BitArray for CompressedBitArray {
    #[inline]
    fn get(&self, index: usize) -> bool {
        self.bitmap.contains(self.key(index))
    }

    #[inline]
    fn set(&mut self, index: usize) -> bool {
        let key = self.key(index);
        self.bitmap.insert(key)
    }

    fn clear(&mut self, index: usize) {
        let key = self.key(index);
        self.bitmap.remove(key);
    }

    fn clear_all(&mut self) {
        self.bitmap.clear();
    }

    fn or(&mut self, other: &Self) -> Result<()> {
        ensure_same_size("or", self.len, other.len)?;
        self.bitmap |= &other.bitmap;
        Ok(())
    }

    fn and(&mut self, other: &Self) -> Result<()> {
        ensure_same_size("and", self.len, other.len)?;
        self.bitmap &= &other.bitmap;
        Ok(())
    }

    fn is_subset_of(&self, other: &Self) -> bool {
        self.len == other.len && self.bitmap.is_subset(&other.bitmap)
    }

    #[inline]
    fn bit_size(&self) -> usize {
        self.len
    }

    #[allow(clippy::cast_possible_truncation)]
    fn count_ones(&self) -> usize {
        self.bitmap.len() as usize
    }

    fn memory_usage(&self) -> usize {
        self.bitmap.serialized_size() + std::mem::size_of::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MILLION: usize = 1_000_000;

    #[test]
    fn test_set_get_clear_every_index() {
        let mut bits = CompressedBitArray::new(MILLION).unwrap();
        for i in 0..MILLION {
            assert!(!bits.get(i));
            assert!(bits.set(i));
            assert!(bits.get(i));
            bits.clear(i);
            assert!(!bits.get(i));
        }
        assert_eq!(bits.count_ones(), 0);
    }

    #[test]
    fn test_new_rejects_bad_sizes() {
        assert!(CompressedBitArray::new(0).is_err());
        if usize::BITS > 32 {
            assert!(CompressedBitArray::new(CompressedBitArray::MAX_BITS).is_ok());
            assert!(matches!(
                CompressedBitArray::new(CompressedBitArray::MAX_BITS + 1),
                Err(BloomError::InvalidFilterSize { .. })
            ));
        }
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_get_out_of_bounds() {
        let bits = CompressedBitArray::new(100).unwrap();
        let _ = bits.get(100);
    }

    #[test]
    fn test_or_and_subset() {
        let mut a = CompressedBitArray::new(1 << 20).unwrap();
        let mut b = CompressedBitArray::new(1 << 20).unwrap();
        a.set(1);
        b.set(1);
        b.set(900_000);

        assert!(a.is_subset_of(&b));
        assert!(!b.is_subset_of(&a));

        let mut union = a.clone();
        union.or(&b).unwrap();
        assert_eq!(union.count_ones(), 2);

        let mut inter = b.clone();
        inter.and(&a).unwrap();
        assert_eq!(inter.iter_ones().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let mut a = CompressedBitArray::new(10).unwrap();
        let b = CompressedBitArray::new(11).unwrap();
        assert!(matches!(
            a.and(&b),
            Err(BloomError::IncompatibleFilters { .. })
        ));
    }

    #[test]
    fn test_portable_bytes_round_trip() {
        let mut bits = CompressedBitArray::new(5000).unwrap();
        for i in (0..5000).step_by(7) {
            bits.set(i);
        }
        let bytes = bits.to_portable_bytes().unwrap();
        let restored = CompressedBitArray::from_portable_bytes(&bytes, 5000).unwrap();
        assert_eq!(restored, bits);
    }

    #[test]
    fn test_from_bitmap_rejects_out_of_range() {
        let bitmap: RoaringBitmap = [3u32, 64].into_iter().collect();
        assert!(CompressedBitArray::from_bitmap(bitmap.clone(), 64).is_err());
        assert!(CompressedBitArray::from_bitmap(bitmap, 65).is_ok());
    }

    #[test]
    fn test_sparse_memory_is_small() {
        let mut bits = CompressedBitArray::new(100_000_000).unwrap();
        for i in 0..100 {
            bits.set(i * 1_000_000);
        }
        // Dense storage would need 12.5 MB.
        assert!(bits.memory_usage() < 64 * 1024);
    }
}
