//! Bit array capability contract and backend selection.
//!
//! A filter stores its bits in exactly one [`BitStorage`]. Two backends are
//! available:
//!
//! | Backend | Type | Memory | Point ops |
//! |---------|------|--------|-----------|
//! | [`Backend::Dense`] | [`DenseBitArray`] | `⌈m/64⌉ × 8` bytes | O(1) |
//! | [`Backend::Compressed`] | [`CompressedBitArray`] | sub-linear when sparse | O(log c) |
//!
//! Dense storage suits modest `m` or high fill ratios. Compressed storage
//! suits very large `m` with comparatively few insertions.
//!
//! # Combining bit arrays
//!
//! [`BitArray::or`] and [`BitArray::and`] take `&Self`, so two concrete
//! backends can only be combined with a peer of the same type. [`BitStorage`]
//! also implements the trait; there a backend mismatch is detected at runtime
//! and reported as [`BloomError::UnsupportedOperation`], and a mixed
//! [`BitArray::is_subset_of`] is `false`. Dense and compressed arrays are
//! never coerced into each other.
//!
//! ```
//! use bloomkit::core::bitarray::{Backend, BitArray, BitStorage};
//!
//! let mut dense = BitStorage::new(Backend::Dense, 128).unwrap();
//! let compressed = BitStorage::new(Backend::Compressed, 128).unwrap();
//!
//! assert!(dense.or(&compressed).is_err());
//! ```

use crate::core::compressed::CompressedBitArray;
use crate::core::dense::DenseBitArray;
use crate::error::{BloomError, Result};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fixed-size bit vector used as filter storage.
///
/// Every `index` passed to a point operation must be `< bit_size()`.
/// Implementations panic otherwise, like slice indexing.
pub trait BitArray: Send + Sync + fmt::Debug {
    /// Read the bit at `index`.
    fn get(&self, index: usize) -> bool;

    /// Set the bit at `index`.
    ///
    /// Always succeeds and is idempotent. Returns `true` iff the bit was
    /// previously unset.
    fn set(&mut self, index: usize) -> bool;

    /// Clear the bit at `index`.
    fn clear(&mut self, index: usize);

    /// Clear every bit.
    fn clear_all(&mut self);

    /// Bitwise OR `other` into `self`.
    ///
    /// # Errors
    ///
    /// [`BloomError::IncompatibleFilters`] if the sizes differ.
    fn or(&mut self, other: &Self) -> Result<()>;

    /// Bitwise AND `other` into `self`.
    ///
    /// # Errors
    ///
    /// [`BloomError::IncompatibleFilters`] if the sizes differ.
    fn and(&mut self, other: &Self) -> Result<()>;

    /// Whether every set bit of `self` is also set in `other`.
    ///
    /// Arrays of different sizes are never subsets of each other.
    fn is_subset_of(&self, other: &Self) -> bool;

    /// Number of addressable bits.
    fn bit_size(&self) -> usize;

    /// Number of bits currently set.
    fn count_ones(&self) -> usize;

    /// Approximate heap and inline bytes held by the array.
    fn memory_usage(&self) -> usize;

    /// Release hook run when the owning filter is closed or dropped.
    ///
    /// # Errors
    ///
    /// Backends holding external resources may report [`BloomError::Io`].
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

pub(crate) fn ensure_same_size(operation: &str, left: usize, right: usize) -> Result<()> {
    if left == right {
        Ok(())
    } else {
        Err(BloomError::incompatible_filters(format!(
            "cannot {} bit arrays of {} and {} bits",
            operation, left, right
        )))
    }
}

/// Storage backend chosen at filter construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Backend {
    /// Direct-addressed word vector.
    #[default]
    Dense,
    /// Roaring-compressed bitmap.
    Compressed,
}

impl Backend {
    /// Lowercase backend name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dense => "dense",
            Self::Compressed => "compressed",
        }
    }

    /// Largest bit count the backend can address.
    #[must_use]
    pub fn max_bits(self) -> usize {
        match self {
            Self::Dense => usize::MAX,
            Self::Compressed => CompressedBitArray::MAX_BITS,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = BloomError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dense" | "bitset" => Ok(Self::Dense),
            "compressed" | "roaring" => Ok(Self::Compressed),
            other => Err(BloomError::invalid_parameters(format!(
                "unknown bit array backend '{}'",
                other
            ))),
        }
    }
}

/// The bit array owned by a filter, tagged by backend.
#[derive(Debug, Clone, PartialEq)]
pub enum BitStorage {
    /// Dense word vector.
    Dense(DenseBitArray),
    /// Roaring bitmap.
    Compressed(CompressedBitArray),
}

impl BitStorage {
    /// Allocate an all-zero array of `num_bits` bits on `backend`.
    ///
    /// # Errors
    ///
    /// [`BloomError::InvalidFilterSize`] if `num_bits` is zero or exceeds
    /// [`Backend::max_bits`].
    pub fn new(backend: Backend, num_bits: usize) -> Result<Self> {
        Ok(match backend {
            Backend::Dense => Self::Dense(DenseBitArray::new(num_bits)?),
            Backend::Compressed => Self::Compressed(CompressedBitArray::new(num_bits)?),
        })
    }

    /// Backend tag of this storage.
    #[must_use]
    pub const fn backend(&self) -> Backend {
        match self {
            Self::Dense(_) => Backend::Dense,
            Self::Compressed(_) => Backend::Compressed,
        }
    }

    /// Indices of all set bits, in ascending order.
    pub fn iter_ones(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        match self {
            Self::Dense(bits) => Box::new(bits.iter_ones()),
            Self::Compressed(bits) => Box::new(bits.iter_ones()),
        }
    }

    fn mismatch(operation: &str, left: Backend, right: Backend) -> BloomError {
        BloomError::unsupported_operation(operation, format!("{} and {}", left, right))
    }
}

impl BitArray for BitStorage {
    #[inline]
    fn get(&self, index: usize) -> bool {
        match self {
            Self::Dense(bits) => bits.get(index),
            Self::Compressed(bits) => bits.get(index),
        }
    }

    #[inline]
    fn set(&mut self, index: usize) -> bool {
        match self {
            Self::Dense(bits) => bits.set(index),
            Self::Compressed(bits) => bits.set(index),
        }
    }

    fn clear(&mut self, index: usize) {
        match self {
            Self::Dense(bits) => bits.clear(index),
            Self::Compressed(bits) => bits.clear(index),
        }
    }

    fn clear_all(&mut self) {
        match self {
            Self::Dense(bits) => bits.clear_all(),
            Self::Compressed(bits) => bits.clear_all(),
        }
    }

    fn or(&mut self, other: &Self) -> Result<()> {
        match (self, other) {
            (Self::Dense(lhs), Self::Dense(rhs)) => lhs.or(rhs),
            (Self::Compressed(lhs), Self::Compressed(rhs)) => lhs.or(rhs),
            (lhs, rhs) => Err(Self::mismatch("or", lhs.backend(), rhs.backend())),
        }
    }

    fn and(&mut self, other: &Self) -> Result<()> {
        match (self, other) {
            (Self::Dense(lhs), Self::Dense(rhs)) => lhs.and(rhs),
            (Self::Compressed(lhs), Self::Compressed(rhs)) => lhs.and(rhs),
            (lhs, rhs) => Err(Self::mismatch("and", lhs.backend(), rhs.backend())),
        }
    }

    /// Mixed backends are never subsets of each other.
    fn is_subset_of(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Dense(lhs), Self::Dense(rhs)) => lhs.is_subset_of(rhs),
            (Self::Compressed(lhs), Self::Compressed(rhs)) => lhs.is_subset_of(rhs),
            _ => false,
        }
    }

    fn bit_size(&self) -> usize {
        match self {
            Self::Dense(bits) => bits.bit_size(),
            Self::Compressed(bits) => bits.bit_size(),
        }
    }

    fn count_ones(&self) -> usize {
        match self {
            Self::Dense(bits) => bits.count_ones(),
            Self::Compressed(bits) => bits.count_ones(),
        }
    }

    fn memory_usage(&self) -> usize {
        match self {
            Self::Dense(bits) => bits.memory_usage(),
            Self::Compressed(bits) => bits.memory_usage(),
        }
    }

    fn close(&mut self) -> Result<()> {
        match self {
            Self::Dense(bits) => bits.close(),
            Self::Compressed(bits) => bits.close(),
        }
    }
}
