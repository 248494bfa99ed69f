//! Exporting and importing filter state.
//!
//! A [`FilterSnapshot`] holds everything a filter exposes: sizing,
//! backend, string encoding and the bit contents. The hash function and
//! decomposer are behavior, not state, so they are supplied again on
//! import. The snapshot records the hash function's name and seed, and
//! import refuses a function that differs in either.
//!
//! # Examples
//!
//! ```
//! use bloomkit::decompose::DefaultDecomposer;
//! use bloomkit::hash::default_hash_function;
//! use bloomkit::{Backend, BloomFilter};
//! use std::sync::Arc;
//!
//! let mut filter = BloomFilter::<str>::new(1_000, 0.01, Backend::Compressed).unwrap();
//! filter.add("hello");
//!
//! let json = serde_json::to_string(&filter.snapshot().unwrap()).unwrap();
//!
//! let restored = BloomFilter::<str>::from_snapshot(
//!     serde_json::from_str(&json).unwrap(),
//!     default_hash_function(),
//!     Arc::new(DefaultDecomposer),
//! )
//! .unwrap();
//! assert!(restored.contains("hello"));
//! ```

use crate::core::bitarray::{Backend, BitStorage};
use crate::core::compressed::CompressedBitArray;
use crate::core::dense::DenseBitArray;
use crate::decompose::{Decomposer, TextEncoding};
use crate::error::{BloomError, Result};
use crate::filters::BloomFilter;
use crate::hash::HashFunction;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Snapshot format version.
pub const FORMAT_VERSION: u16 = 1;

/// Serializable state of a [`BloomFilter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSnapshot {
    /// Format version, [`FORMAT_VERSION`] when written by this crate.
    pub version: u16,
    /// Bit count `m`.
    pub num_bits: usize,
    /// Hash count `k`.
    pub num_hashes: usize,
    /// Capacity the filter was sized for.
    pub expected_insertions: usize,
    /// False positive probability the filter was sized for.
    pub target_fpp: f64,
    /// String encoding.
    pub encoding: TextEncoding,
    /// [`HashFunction::name`] of the exporting filter.
    pub hash_function: String,
    /// [`HashFunction::seed`] of the exporting filter.
    pub hash_seed: u64,
    /// Bit contents.
    pub payload: SnapshotPayload,
}

/// Bit contents of a snapshot, by backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum SnapshotPayload {
    /// Dense words, bit `i` at word `i / 64`, position `i % 64`.
    Dense {
        /// Backing words.
        words: Vec<u64>,
    },
    /// Roaring portable serialization.
    Compressed {
        /// Encoded bitmap.
        bytes: Vec<u8>,
    },
}

impl SnapshotPayload {
    /// Backend this payload restores into.
    #[must_use]
    pub const fn backend(&self) -> Backend {
        match self {
            Self::Dense { .. } => Backend::Dense,
            Self::Compressed { .. } => Backend::Compressed,
        }
    }
}

impl FilterSnapshot {
    /// Backend this snapshot restores into.
    #[must_use]
    pub const fn backend(&self) -> Backend {
        self.payload.backend()
    }

    fn into_storage(self) -> Result<BitStorage> {
        let num_bits = self.num_bits;
        let storage = match self.payload {
            SnapshotPayload::Dense { words } => {
                DenseBitArray::from_words(words, num_bits).map(BitStorage::Dense)
            }
            SnapshotPayload::Compressed { bytes } => {
                CompressedBitArray::from_portable_bytes(&bytes, num_bits).map(BitStorage::Compressed)
            }
        };
        storage.map_err(|err| BloomError::snapshot(err.to_string()))
    }
}

impl<T: ?Sized> BloomFilter<T> {
    /// Export the filter's state.
    ///
    /// # Errors
    ///
    /// - [`BloomError::Closed`] if the filter is closed
    /// - [`BloomError::Io`] if the compressed bitmap fails to encode
    pub fn snapshot(&self) -> Result<FilterSnapshot> {
        if self.is_closed() {
            return Err(BloomError::closed("snapshot"));
        }
        let payload = match self.bits() {
            BitStorage::Dense(bits) => SnapshotPayload::Dense {
                words: bits.words().to_vec(),
            },
            BitStorage::Compressed(bits) => SnapshotPayload::Compressed {
                bytes: bits.to_portable_bytes()?,
            },
        };

        Ok(FilterSnapshot {
            version: FORMAT_VERSION,
            num_bits: self.num_bits(),
            num_hashes: self.num_hashes(),
            expected_insertions: self.expected_insertions(),
            target_fpp: self.target_fpp(),
            encoding: self.charset(),
            hash_function: self.hash_function().name().to_string(),
            hash_seed: self.hash_function().seed(),
            payload,
        })
    }

    /// Rebuild a filter from a snapshot.
    ///
    /// # Errors
    ///
    /// [`BloomError::Snapshot`] if the version is unknown, `hasher` is not
    /// the hash function (name and seed) that wrote the snapshot, or the payload does not
    /// fit `num_bits`. [`BloomError::InvalidHashCount`] if `num_hashes` is 0.
    pub fn from_snapshot(
        snapshot: FilterSnapshot,
        hasher: Arc<dyn HashFunction>,
        decomposer: Arc<dyn Decomposer<T>>,
    ) -> Result<Self> {
        if snapshot.version != FORMAT_VERSION {
            return Err(BloomError::snapshot(format!(
                "unsupported version {} (expected {})",
                snapshot.version, FORMAT_VERSION
            )));
        }
        if snapshot.hash_function != hasher.name() {
            return Err(BloomError::snapshot(format!(
                "written with hash function '{}', got '{}'",
                snapshot.hash_function,
                hasher.name()
            )));
        }
        if snapshot.hash_seed != hasher.seed() {
            return Err(BloomError::snapshot(format!(
                "written with hash seed {:#x}, got {:#x}",
                snapshot.hash_seed,
                hasher.seed()
            )));
        }

        let (num_hashes, expected_insertions, target_fpp, encoding) = (
            snapshot.num_hashes,
            snapshot.expected_insertions,
            snapshot.target_fpp,
            snapshot.encoding,
        );
        let bits = snapshot.into_storage()?;

        Self::from_storage(
            bits,
            num_hashes,
            expected_insertions,
            target_fpp,
            hasher,
            decomposer,
            encoding,
        )
    }
}
