//! Reader/writer-locked Bloom filter.
//!
//! [`SharedBloomFilter`] wraps a [`BloomFilter`] in a `parking_lot::RwLock`
//! so every method takes `&self` and the filter can sit behind an `Arc`:
//!
//! - **Readers** (`contains`, `contains_all`, `maybe_subset_of`, accessors)
//!   share the lock.
//! - **Writers** (`add`, `add_all`, `merge`, `intersect`, `clear`,
//!   `set_charset`, `close`) hold it exclusively, so a query never sees a
//!   half-applied bulk operation.
//!
//! # Lock ordering
//!
//! Operations touching two shared filters lock them in address order.
//! Merging or intersecting a filter with itself is rejected instead of
//! deadlocking.
//!
//! # Examples
//!
//! ```
//! use bloomkit::sync::SharedBloomFilter;
//! use bloomkit::Backend;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let filter = Arc::new(SharedBloomFilter::<u64>::new(10_000, 0.01, Backend::Dense).unwrap());
//!
//! let handles: Vec<_> = (0..4u64)
//!     .map(|t| {
//!         let filter = Arc::clone(&filter);
//!         thread::spawn(move || {
//!             for i in 0..100 {
//!                 filter.add(&(t * 100 + i));
//!             }
//!         })
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! assert!((0..400u64).all(|i| filter.contains(&i)));
//! ```

use crate::core::bitarray::Backend;
use crate::decompose::{Decompose, TextEncoding};
use crate::error::{BloomError, Result};
use crate::filters::bloom::rejected_combination;
use crate::filters::BloomFilter;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::fmt;
use std::ptr;

/// A [`BloomFilter`] behind a reader/writer lock.
pub struct SharedBloomFilter<T: ?Sized> {
    inner: RwLock<BloomFilter<T>>,
}

impl<T: Decompose + ?Sized> SharedBloomFilter<T> {
    /// Create a shared filter with the default hash function and decomposer.
    ///
    /// # Errors
    ///
    /// Same as [`BloomFilter::new`].
    pub fn new(expected_insertions: usize, fpp: f64, backend: Backend) -> Result<Self> {
        BloomFilter::new(expected_insertions, fpp, backend).map(Self::from_filter)
    }
}

impl<T: ?Sized> SharedBloomFilter<T> {
    /// Share an existing filter.
    #[must_use]
    pub fn from_filter(filter: BloomFilter<T>) -> Self {
        Self {
            inner: RwLock::new(filter),
        }
    }

    /// Take the filter back out.
    #[must_use]
    pub fn into_inner(self) -> BloomFilter<T> {
        self.inner.into_inner()
    }

    /// Shared lock on the filter, for several reads under one lock.
    pub fn read(&self) -> RwLockReadGuard<'_, BloomFilter<T>> {
        self.inner.read()
    }

    /// Exclusive lock on the filter.
    pub fn write(&self) -> RwLockWriteGuard<'_, BloomFilter<T>> {
        self.inner.write()
    }

    /// See [`BloomFilter::add`].
    pub fn add(&self, item: &T) -> bool {
        self.inner.write().add(item)
    }

    /// See [`BloomFilter::add_bytes`].
    pub fn add_bytes(&self, bytes: &[u8]) -> bool {
        self.inner.write().add_bytes(bytes)
    }

    /// Add every item under one exclusive lock.
    pub fn add_all<'a, I>(&self, items: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        self.inner.write().add_all(items)
    }

    /// See [`BloomFilter::contains`].
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.inner.read().contains(item)
    }

    /// See [`BloomFilter::contains_bytes`].
    #[must_use]
    pub fn contains_bytes(&self, bytes: &[u8]) -> bool {
        self.inner.read().contains_bytes(bytes)
    }

    /// Check every item under one shared lock.
    #[must_use]
    pub fn contains_all<'a, I>(&self, items: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        self.inner.read().contains_all(items)
    }

    /// See [`BloomFilter::clear`].
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    fn reject_self(&self, other: &Self, operation: &str) -> Result<()> {
        if ptr::eq(self, other) {
            return Err(rejected_combination(
                operation,
                BloomError::incompatible_filters("self-merge"),
            ));
        }
        Ok(())
    }

    /// Run `op` with `self` locked for writing and `other` for reading,
    /// acquiring the two locks in address order.
    fn with_pair<R>(
        &self,
        other: &Self,
        op: impl FnOnce(&mut BloomFilter<T>, &BloomFilter<T>) -> R,
    ) -> R {
        if (self as *const Self) < (other as *const Self) {
            let mut target = self.inner.write();
            let source = other.inner.read();
            op(&mut *target, &*source)
        } else {
            let source = other.inner.read();
            let mut target = self.inner.write();
            op(&mut *target, &*source)
        }
    }

    /// OR `other` into `self`.
    ///
    /// # Errors
    ///
    /// [`BloomError::IncompatibleFilters`] when `other` is `self`, otherwise
    /// as [`BloomFilter::merge`].
    pub fn merge(&self, other: &Self) -> Result<()> {
        self.reject_self(other, "merge")?;
        self.with_pair(other, |target, source| target.merge(source))
    }

    /// AND `other` into `self`.
    ///
    /// # Errors
    ///
    /// [`BloomError::IncompatibleFilters`] when `other` is `self`, otherwise
    /// as [`BloomFilter::intersect`].
    pub fn intersect(&self, other: &Self) -> Result<()> {
        self.reject_self(other, "intersect")?;
        self.with_pair(other, |target, source| target.intersect(source))
    }

    /// OR an unshared filter into `self`.
    ///
    /// # Errors
    ///
    /// As [`BloomFilter::merge`].
    pub fn merge_filter(&self, other: &BloomFilter<T>) -> Result<()> {
        self.inner.write().merge(other)
    }

    /// AND an unshared filter into `self`.
    ///
    /// # Errors
    ///
    /// As [`BloomFilter::intersect`].
    pub fn intersect_filter(&self, other: &BloomFilter<T>) -> Result<()> {
        self.inner.write().intersect(other)
    }

    /// See [`BloomFilter::maybe_subset_of`].
    ///
    /// # Errors
    ///
    /// As [`BloomFilter::maybe_subset_of`].
    pub fn maybe_subset_of(&self, other: &Self) -> Result<bool> {
        if ptr::eq(self, other) {
            let guard = self.inner.read();
            return guard.maybe_subset_of(&guard);
        }
        if (self as *const Self) < (other as *const Self) {
            let this = self.inner.read();
            let that = other.inner.read();
            this.maybe_subset_of(&that)
        } else {
            let that = other.inner.read();
            let this = self.inner.read();
            this.maybe_subset_of(&that)
        }
    }

    /// Equivalent to `other.maybe_subset_of(self)`.
    ///
    /// # Errors
    ///
    /// As [`BloomFilter::maybe_subset_of`].
    pub fn maybe_superset_of(&self, other: &Self) -> Result<bool> {
        other.maybe_subset_of(self)
    }

    /// Whether `other` has the same bit and hash counts.
    #[must_use]
    pub fn is_compatible_with(&self, other: &Self) -> bool {
        // m and k never change after construction
        self.num_bits() == other.num_bits() && self.num_hashes() == other.num_hashes()
    }

    /// See [`BloomFilter::num_bits`].
    #[must_use]
    pub fn num_bits(&self) -> usize {
        self.inner.read().num_bits()
    }

    /// See [`BloomFilter::num_hashes`].
    #[must_use]
    pub fn num_hashes(&self) -> usize {
        self.inner.read().num_hashes()
    }

    /// See [`BloomFilter::false_positive_probability`].
    #[must_use]
    pub fn false_positive_probability(&self, inserted: usize) -> f64 {
        self.inner.read().false_positive_probability(inserted)
    }

    /// See [`BloomFilter::count_set_bits`].
    #[must_use]
    pub fn count_set_bits(&self) -> usize {
        self.inner.read().count_set_bits()
    }

    /// See [`BloomFilter::estimated_cardinality`].
    #[must_use]
    pub fn estimated_cardinality(&self) -> usize {
        self.inner.read().estimated_cardinality()
    }

    /// See [`BloomFilter::backend`].
    #[must_use]
    pub fn backend(&self) -> Backend {
        self.inner.read().backend()
    }

    /// See [`BloomFilter::charset`].
    #[must_use]
    pub fn charset(&self) -> TextEncoding {
        self.inner.read().charset()
    }

    /// See [`BloomFilter::set_charset`].
    ///
    /// # Errors
    ///
    /// As [`BloomFilter::set_charset`].
    pub fn set_charset(&self, name: &str) -> Result<()> {
        self.inner.write().set_charset(name)
    }

    /// See [`BloomFilter::close`].
    ///
    /// # Errors
    ///
    /// As [`BloomFilter::close`].
    pub fn close(&self) -> Result<()> {
        self.inner.write().close()
    }

    /// See [`BloomFilter::is_closed`].
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.read().is_closed()
    }
}

impl<T: ?Sized> From<BloomFilter<T>> for SharedBloomFilter<T> {
    fn from(filter: BloomFilter<T>) -> Self {
        Self::from_filter(filter)
    }
}

impl<T: ?Sized> fmt::Debug for SharedBloomFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_read() {
            Some(filter) => f
                .debug_struct("SharedBloomFilter")
                .field("filter", &*filter)
                .finish(),
            None => f
                .debug_struct("SharedBloomFilter")
                .field("filter", &"<locked>")
                .finish(),
        }
    }
}
