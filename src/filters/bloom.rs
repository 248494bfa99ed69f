//! The Bloom filter core.
//!
//! [`BloomFilter`] owns one bit array, shares one hash function and one
//! decomposer, and holds the sizing fixed at construction. Every insertion
//! and query runs the same pipeline:
//!
//! ```text
//! item ──decompose──▶ bytes ──hash──▶ (h1, h2) ──double hashing──▶ k indices ──▶ bit array
//! ```
//!
//! # Properties
//!
//! - **False negatives**: never. Every added item is reported present.
//! - **False positives**: about `target_fpp` once `expected_insertions` items are in.
//! - **Time**: O(k) per item, O(m) per bulk operation.
//!
//! # Concurrency
//!
//! The filter has no internal synchronization. Mutating operations take
//! `&mut self`, so exclusive access is enforced by the borrow checker.
//! Share a filter across threads with
//! [`SharedBloomFilter`](crate::sync::SharedBloomFilter) or an external
//! reader/writer lock.
//!
//! # Examples
//!
//! ```
//! use bloomkit::{Backend, BloomFilter};
//!
//! # fn main() -> bloomkit::Result<()> {
//! let mut seen = BloomFilter::<str>::new(10_000, 0.01, Backend::Dense)?;
//! seen.add("alice");
//!
//! assert!(seen.contains("alice"));
//! assert!(!seen.contains("mallory"));
//! # Ok(())
//! # }
//! ```

use crate::core::bitarray::{Backend, BitArray, BitStorage};
use crate::core::params;
use crate::decompose::{ByteSink, Decompose, Decomposer, DefaultDecomposer, TextEncoding};
use crate::error::{BloomError, Result};
use crate::hash::{default_hash_function, DoubleHashing, HashFunction};
use std::f64::consts::LN_2;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Space-efficient approximate set over values of type `T`.
///
/// `T` may be unsized, so `BloomFilter<str>` and `BloomFilter<[u8]>` accept
/// borrowed items directly.
pub struct BloomFilter<T: ?Sized> {
    bits: BitStorage,
    num_bits: usize,
    num_hashes: usize,
    expected_insertions: usize,
    target_fpp: f64,
    hasher: Arc<dyn HashFunction>,
    decomposer: Arc<dyn Decomposer<T>>,
    encoding: TextEncoding,
    closed: bool,
}

impl<T: Decompose + ?Sized> BloomFilter<T> {
    /// Create a filter sized for `expected_insertions` items at false positive
    /// probability `fpp`, using the default hash function and decomposer.
    ///
    /// # Errors
    ///
    /// - [`BloomError::InvalidItemCount`] if `expected_insertions == 0`
    /// - [`BloomError::FalsePositiveRateOutOfBounds`] if `fpp` is not in (0, 1)
    /// - [`BloomError::InvalidFilterSize`] if the computed size exceeds the backend's limit
    pub fn new(expected_insertions: usize, fpp: f64, backend: Backend) -> Result<Self> {
        Self::with_parts(
            expected_insertions,
            fpp,
            backend,
            default_hash_function(),
            Arc::new(DefaultDecomposer),
        )
    }
}

impl<T: ?Sized> BloomFilter<T> {
    /// Create a filter with an explicit hash function and decomposer.
    ///
    /// # Errors
    ///
    /// Same conditions as [`BloomFilter::new`].
    pub fn with_parts(
        expected_insertions: usize,
        fpp: f64,
        backend: Backend,
        hasher: Arc<dyn HashFunction>,
        decomposer: Arc<dyn Decomposer<T>>,
    ) -> Result<Self> {
        let (num_bits, num_hashes) = params::filter_params(expected_insertions, fpp)?;
        Self::assemble(
            num_bits,
            num_hashes,
            expected_insertions,
            fpp,
            backend,
            hasher,
            decomposer,
        )
    }

    /// Create a filter with exact sizing.
    ///
    /// The reported capacity is the insertion count at which `num_hashes` is
    /// optimal for `num_bits`, and the reported target is the false positive
    /// probability at that load.
    ///
    /// # Errors
    ///
    /// - [`BloomError::InvalidHashCount`] if `num_hashes == 0`
    /// - [`BloomError::InvalidFilterSize`] if `num_bits` is 0 or exceeds the backend's limit
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn with_params(
        num_bits: usize,
        num_hashes: usize,
        backend: Backend,
        hasher: Arc<dyn HashFunction>,
        decomposer: Arc<dyn Decomposer<T>>,
    ) -> Result<Self> {
        if num_hashes == 0 {
            return Err(BloomError::invalid_hash_count(num_hashes));
        }
        let capacity = ((num_bits as f64 * LN_2 / num_hashes as f64).round() as usize).max(1);
        let fpp = params::false_positive_probability(num_bits, num_hashes, capacity);
        Self::assemble(
            num_bits, num_hashes, capacity, fpp, backend, hasher, decomposer,
        )
    }

    fn assemble(
        num_bits: usize,
        num_hashes: usize,
        expected_insertions: usize,
        target_fpp: f64,
        backend: Backend,
        hasher: Arc<dyn HashFunction>,
        decomposer: Arc<dyn Decomposer<T>>,
    ) -> Result<Self> {
        let bits = BitStorage::new(backend, num_bits)?;
        debug!(
            num_bits,
            num_hashes,
            expected_insertions,
            target_fpp,
            backend = %backend,
            hasher = hasher.name(),
            "created bloom filter"
        );

        Ok(Self {
            bits,
            num_bits,
            num_hashes,
            expected_insertions,
            target_fpp,
            hasher,
            decomposer,
            encoding: TextEncoding::default(),
            closed: false,
        })
    }

    #[cfg_attr(not(feature = "serde"), allow(dead_code))]
    pub(crate) fn from_storage(
        bits: BitStorage,
        num_hashes: usize,
        expected_insertions: usize,
        target_fpp: f64,
        hasher: Arc<dyn HashFunction>,
        decomposer: Arc<dyn Decomposer<T>>,
        encoding: TextEncoding,
    ) -> Result<Self> {
        if num_hashes == 0 {
            return Err(BloomError::invalid_hash_count(num_hashes));
        }
        Ok(Self {
            num_bits: bits.bit_size(),
            bits,
            num_hashes,
            expected_insertions,
            target_fpp,
            hasher,
            decomposer,
            encoding,
            closed: false,
        })
    }

    // Insertion and membership

    /// Add an item.
    ///
    /// Returns `true` iff at least one of the item's bits went from unset to
    /// set. A `false` result means every bit was already set, which happens
    /// for repeated items and for colliding new ones alike, so it is a
    /// "possibly new" hint and not a novelty test.
    pub fn add(&mut self, item: &T) -> bool {
        let sink = self.decompose(item);
        self.add_bytes(sink.as_bytes())
    }

    /// Add raw bytes, bypassing the decomposer.
    ///
    /// A closed filter stays empty: the add is ignored and returns `false`.
    pub fn add_bytes(&mut self, bytes: &[u8]) -> bool {
        if self.closed {
            return false;
        }
        let (h1, h2) = DoubleHashing::base_pair(self.hasher.as_ref(), bytes);
        let mut changed = false;
        for index in DoubleHashing::indices(h1, h2, self.num_hashes, self.num_bits) {
            changed |= self.bits.set(index);
        }
        changed
    }

    /// Whether the item may have been added.
    ///
    /// `false` is certain. `true` is wrong with probability about
    /// [`Self::false_positive_probability`] at the current load.
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        let sink = self.decompose(item);
        self.contains_bytes(sink.as_bytes())
    }

    /// Whether the raw bytes may have been added.
    #[must_use]
    pub fn contains_bytes(&self, bytes: &[u8]) -> bool {
        if self.closed {
            return false;
        }
        let (h1, h2) = DoubleHashing::base_pair(self.hasher.as_ref(), bytes);
        DoubleHashing::indices(h1, h2, self.num_hashes, self.num_bits)
            .all(|index| self.bits.get(index))
    }

    /// Add every item. Returns `true` if any single add changed a bit.
    pub fn add_all<'a, I>(&mut self, items: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        items
            .into_iter()
            .fold(false, |changed, item| self.add(item) | changed)
    }

    /// Whether every item may have been added. Vacuously true when empty.
    #[must_use]
    pub fn contains_all<'a, I>(&self, items: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        items.into_iter().all(|item| self.contains(item))
    }

    /// Reset every bit. Sizing and configuration are kept.
    pub fn clear(&mut self) {
        self.bits.clear_all();
    }

    fn decompose(&self, item: &T) -> ByteSink {
        let mut sink = ByteSink::new(self.encoding);
        self.decomposer.decompose(item, &mut sink);
        sink
    }

    // Set algebra

    /// Whether `other` has the same bit count and hash count.
    ///
    /// Compatible filters built on different backends, hash functions or
    /// encodings still cannot be combined; see [`Self::merge`].
    #[must_use]
    pub fn is_compatible_with(&self, other: &Self) -> bool {
        self.num_bits == other.num_bits && self.num_hashes == other.num_hashes
    }

    fn ensure_combinable(&self, other: &Self, operation: &str) -> Result<()> {
        if self.closed || other.closed {
            return Err(BloomError::closed(operation));
        }
        if self.num_bits != other.num_bits {
            return Err(BloomError::incompatible_filters(format!(
                "bit count {} != {}",
                self.num_bits, other.num_bits
            )));
        }
        if self.num_hashes != other.num_hashes {
            return Err(BloomError::incompatible_filters(format!(
                "hash count {} != {}",
                self.num_hashes, other.num_hashes
            )));
        }
        if !self.hashes_like(other) {
            return Err(BloomError::incompatible_filters(format!(
                "hash function {} (seed {:#x}) != {} (seed {:#x})",
                self.hasher.name(),
                self.hasher.seed(),
                other.hasher.name(),
                other.hasher.seed()
            )));
        }
        if self.encoding != other.encoding {
            return Err(BloomError::incompatible_filters(format!(
                "encoding {} != {}",
                self.encoding, other.encoding
            )));
        }
        let (left, right) = (self.backend(), other.backend());
        if left != right {
            return Err(BloomError::unsupported_operation(
                operation,
                format!("{} and {}", left, right),
            ));
        }
        Ok(())
    }

    fn hashes_like(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.hasher, &other.hasher)
            || (self.hasher.name() == other.hasher.name()
                && self.hasher.seed() == other.hasher.seed())
    }

    /// Union: OR `other`'s bits into `self`.
    ///
    /// Afterwards `self` reports every item either filter had. The false
    /// positive probability is at least that of either input.
    ///
    /// # Errors
    ///
    /// - [`BloomError::IncompatibleFilters`] if bit or hash counts differ, or
    ///   the filters hash or encode items differently
    /// - [`BloomError::UnsupportedOperation`] if the backends differ
    /// - [`BloomError::Closed`] if either filter is closed
    ///
    /// `self` is unchanged on error.
    pub fn merge(&mut self, other: &Self) -> Result<()> {
        self.ensure_combinable(other, "merge")
            .and_then(|()| self.bits.or(&other.bits))
            .map_err(|err| rejected_combination("merge", err))?;
        debug!(num_bits = self.num_bits, "merged bloom filter");
        Ok(())
    }

    /// Approximate intersection: AND `other`'s bits into `self`.
    ///
    /// Items in both inputs stay present. Items in only one input may still
    /// be reported, at a rate above that of a filter built from the true
    /// intersection.
    ///
    /// # Errors
    ///
    /// Same as [`Self::merge`]. `self` is unchanged on error.
    pub fn intersect(&mut self, other: &Self) -> Result<()> {
        self.ensure_combinable(other, "intersect")
            .and_then(|()| self.bits.and(&other.bits))
            .map_err(|err| rejected_combination("intersect", err))?;
        debug!(num_bits = self.num_bits, "intersected bloom filter");
        Ok(())
    }

    /// Whether every bit set in `self` is also set in `other`.
    ///
    /// Necessary for `self ⊆ other` but not sufficient: collisions can make
    /// unrelated sets look like subsets.
    ///
    /// # Errors
    ///
    /// Same as [`Self::merge`].
    pub fn maybe_subset_of(&self, other: &Self) -> Result<bool> {
        self.ensure_combinable(other, "maybe_subset_of")
            .map_err(|err| rejected_combination("maybe_subset_of", err))?;
        Ok(self.bits.is_subset_of(&other.bits))
    }

    /// Equivalent to `other.maybe_subset_of(self)`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::merge`].
    pub fn maybe_superset_of(&self, other: &Self) -> Result<bool> {
        other.maybe_subset_of(self)
    }

    // Sizing and statistics

    /// Bit count `m`.
    #[must_use]
    pub const fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// Hash count `k`.
    #[must_use]
    pub const fn num_hashes(&self) -> usize {
        self.num_hashes
    }

    /// Capacity the filter was sized for.
    #[must_use]
    pub const fn expected_insertions(&self) -> usize {
        self.expected_insertions
    }

    /// False positive probability the filter was sized for.
    #[must_use]
    pub const fn target_fpp(&self) -> f64 {
        self.target_fpp
    }

    /// Theoretical false positive probability after `inserted` items.
    #[must_use]
    pub fn false_positive_probability(&self, inserted: usize) -> f64 {
        params::false_positive_probability(self.num_bits, self.num_hashes, inserted)
    }

    /// Number of set bits.
    #[must_use]
    pub fn count_set_bits(&self) -> usize {
        self.bits.count_ones()
    }

    /// Fraction of bits set.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fill_ratio(&self) -> f64 {
        self.count_set_bits() as f64 / self.num_bits as f64
    }

    /// Estimated number of distinct items added, from the fill ratio.
    #[must_use]
    pub fn estimated_cardinality(&self) -> usize {
        params::estimate_cardinality(self.num_bits, self.num_hashes, self.count_set_bits())
    }

    /// Whether no bit is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count_set_bits() == 0
    }

    /// Storage backend.
    #[must_use]
    pub const fn backend(&self) -> Backend {
        self.bits.backend()
    }

    /// Approximate bytes used by the bit array.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.bits.memory_usage()
    }

    /// Read-only view of the bit array.
    #[must_use]
    pub const fn bits(&self) -> &BitStorage {
        &self.bits
    }

    // Configuration

    /// Shared hash function.
    #[must_use]
    pub fn hash_function(&self) -> &Arc<dyn HashFunction> {
        &self.hasher
    }

    /// Shared decomposer.
    #[must_use]
    pub fn object_decomposer(&self) -> &Arc<dyn Decomposer<T>> {
        &self.decomposer
    }

    /// Encoding applied to strings during decomposition.
    #[must_use]
    pub const fn charset(&self) -> TextEncoding {
        self.encoding
    }

    /// Select the string encoding by charset name, e.g. `"UTF-16LE"`.
    ///
    /// Items added before the change hash differently from the same items
    /// queried after it.
    ///
    /// # Errors
    ///
    /// [`BloomError::InvalidParameters`] for an unknown charset name.
    pub fn set_charset(&mut self, name: &str) -> Result<()> {
        self.encoding = name.parse()?;
        Ok(())
    }

    /// Select the string encoding.
    pub fn set_encoding(&mut self, encoding: TextEncoding) {
        self.encoding = encoding;
    }

    // Lifecycle

    /// Run the bit array's release hook and drop the filter's contents.
    ///
    /// Idempotent. A closed filter is empty: adds are ignored, queries
    /// report `false`, and set algebra fails with [`BloomError::Closed`].
    ///
    /// # Errors
    ///
    /// Whatever the backend's release hook reports. The filter is marked
    /// closed either way.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        trace!(backend = %self.backend(), "closing bloom filter");
        let released = self.bits.close();
        self.bits.clear_all();
        released
    }

    /// Whether [`Self::close`] has run.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Log a refused merge, intersect or subset check and hand the error back.
pub(crate) fn rejected_combination(operation: &str, err: BloomError) -> BloomError {
    warn!(operation, error = %err, "rejected bloom filter combination");
    err
}

impl<T: ?Sized> Drop for BloomFilter<T> {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(err) = self.bits.close() {
                warn!(error = %err, "failed to release bloom filter storage");
            }
        }
    }
}

impl<T: ?Sized> Clone for BloomFilter<T> {
    fn clone(&self) -> Self {
        Self {
            bits: self.bits.clone(),
            num_bits: self.num_bits,
            num_hashes: self.num_hashes,
            expected_insertions: self.expected_insertions,
            target_fpp: self.target_fpp,
            hasher: Arc::clone(&self.hasher),
            decomposer: Arc::clone(&self.decomposer),
            encoding: self.encoding,
            closed: self.closed,
        }
    }
}

impl<T: ?Sized> fmt::Debug for BloomFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BloomFilter")
            .field("num_bits", &self.num_bits)
            .field("num_hashes", &self.num_hashes)
            .field("expected_insertions", &self.expected_insertions)
            .field("target_fpp", &self.target_fpp)
            .field("backend", &self.backend())
            .field("hasher", &self.hasher.name())
            .field("encoding", &self.encoding)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}
