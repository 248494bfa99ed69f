//! The common filter surface.
//!
//! [`Filter`] is implemented by [`BloomFilter`] itself and by every wrapper
//! around it, so code can accept "anything that behaves like a Bloom
//! filter" without caring whether it is decorated:
//!
//! ```text
//! Filter<T>
//!     ├── BloomFilter<T>              (the core)
//!     └── DelegatingFilter<F, L>      (forwards to F through layer L)
//! ```
//!
//! Set algebra always takes the *core* of the other side. Wrappers expose
//! their core through [`Filter::as_bloom`], so
//! `wrapped.merge(other_wrapped.as_bloom())` works for any combination.

use crate::decompose::{Decomposer, TextEncoding};
use crate::error::Result;
use crate::filters::BloomFilter;
use crate::hash::HashFunction;
use std::sync::Arc;

/// Operations shared by Bloom filters and their wrappers.
///
/// Only the mutating and combining operations are required. Queries about
/// sizing and configuration default to the core returned by
/// [`Filter::as_bloom`].
pub trait Filter<T: ?Sized> {
    /// Add an item. Returns `true` iff at least one bit changed.
    fn add(&mut self, item: &T) -> bool;

    /// Add raw bytes, bypassing the decomposer.
    fn add_bytes(&mut self, bytes: &[u8]) -> bool;

    /// Whether the item may have been added.
    fn contains(&self, item: &T) -> bool;

    /// Whether the raw bytes may have been added.
    fn contains_bytes(&self, bytes: &[u8]) -> bool;

    /// OR `other` into this filter.
    ///
    /// # Errors
    ///
    /// See [`BloomFilter::merge`].
    fn merge(&mut self, other: &BloomFilter<T>) -> Result<()>;

    /// AND `other` into this filter.
    ///
    /// # Errors
    ///
    /// See [`BloomFilter::intersect`].
    fn intersect(&mut self, other: &BloomFilter<T>) -> Result<()>;

    /// Reset every bit.
    fn clear(&mut self);

    /// Release the filter's storage.
    ///
    /// # Errors
    ///
    /// See [`BloomFilter::close`].
    fn close(&mut self) -> Result<()>;

    /// Select the string encoding by charset name.
    ///
    /// # Errors
    ///
    /// See [`BloomFilter::set_charset`].
    fn set_charset(&mut self, name: &str) -> Result<()>;

    /// The underlying core filter.
    fn as_bloom(&self) -> &BloomFilter<T>;

    /// Add every item. Returns `true` if any single add changed a bit.
    fn add_all<'a, I>(&mut self, items: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
        Self: Sized,
    {
        items
            .into_iter()
            .fold(false, |changed, item| self.add(item) | changed)
    }

    /// Whether every item may have been added.
    fn contains_all<'a, I>(&self, items: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
        Self: Sized,
    {
        items.into_iter().all(|item| self.contains(item))
    }

    /// See [`BloomFilter::is_compatible_with`].
    fn is_compatible_with(&self, other: &BloomFilter<T>) -> bool {
        self.as_bloom().is_compatible_with(other)
    }

    /// See [`BloomFilter::maybe_subset_of`].
    ///
    /// # Errors
    ///
    /// See [`BloomFilter::maybe_subset_of`].
    fn maybe_subset_of(&self, other: &BloomFilter<T>) -> Result<bool> {
        self.as_bloom().maybe_subset_of(other)
    }

    /// See [`BloomFilter::maybe_superset_of`].
    ///
    /// # Errors
    ///
    /// See [`BloomFilter::maybe_subset_of`].
    fn maybe_superset_of(&self, other: &BloomFilter<T>) -> Result<bool> {
        self.as_bloom().maybe_superset_of(other)
    }

    /// Bit count `m`.
    fn num_bits(&self) -> usize {
        self.as_bloom().num_bits()
    }

    /// Hash count `k`.
    fn num_hashes(&self) -> usize {
        self.as_bloom().num_hashes()
    }

    /// Theoretical false positive probability after `inserted` items.
    fn false_positive_probability(&self, inserted: usize) -> f64 {
        self.as_bloom().false_positive_probability(inserted)
    }

    /// Shared hash function.
    fn hash_function<'a>(&'a self) -> &'a Arc<dyn HashFunction>
    where
        T: 'a,
    {
        self.as_bloom().hash_function()
    }

    /// Shared decomposer.
    fn object_decomposer<'a>(&'a self) -> &'a Arc<dyn Decomposer<T>>
    where
        T: 'a,
    {
        self.as_bloom().object_decomposer()
    }

    /// Current string encoding.
    fn charset(&self) -> TextEncoding {
        self.as_bloom().charset()
    }

    /// Whether the filter has been closed.
    fn is_closed(&self) -> bool {
        self.as_bloom().is_closed()
    }
}

impl<T: ?Sized> Filter<T> for BloomFilter<T> {
    #[inline]
    fn add(&mut self, item: &T) -> bool {
        BloomFilter::add(self, item)
    }

    #[inline]
    fn add_bytes(&mut self, bytes: &[u8]) -> bool {
        BloomFilter::add_bytes(self, bytes)
    }

    #[inline]
    fn contains(&self, item: &T) -> bool {
        BloomFilter::contains(self, item)
    }

    #[inline]
    fn contains_bytes(&self, bytes: &[u8]) -> bool {
        BloomFilter::contains_bytes(self, bytes)
    }

    fn merge(&mut self, other: &BloomFilter<T>) -> Result<()> {
        BloomFilter::merge(self, other)
    }

    fn intersect(&mut self, other: &BloomFilter<T>) -> Result<()> {
        BloomFilter::intersect(self, other)
    }

    fn clear(&mut self) {
        BloomFilter::clear(self);
    }

    fn close(&mut self) -> Result<()> {
        BloomFilter::close(self)
    }

    fn set_charset(&mut self, name: &str) -> Result<()> {
        BloomFilter::set_charset(self, name)
    }

    fn as_bloom(&self) -> &BloomFilter<T> {
        self
    }
}
