//! Filters that wrap another filter.
//!
//! A [`DelegatingFilter`] forwards every operation to an inner [`Filter`]
//! through a [`FilterLayer`]. A layer overrides only the hooks it cares
//! about; the rest pass straight through. Layers stack by nesting:
//!
//! ```
//! use bloomkit::filters::{DelegatingFilter, InsertionCounter};
//! use bloomkit::{Backend, BloomFilter, Filter};
//!
//! # fn main() -> bloomkit::Result<()> {
//! let core = BloomFilter::<str>::new(1_000, 0.01, Backend::Dense)?;
//! let mut counted = DelegatingFilter::with_layer(core, InsertionCounter::default());
//!
//! counted.add("a");
//! counted.add("a");
//! assert_eq!(counted.layer().count(), 1);
//! assert!(counted.contains("a"));
//! # Ok(())
//! # }
//! ```

use crate::core::filter::Filter;
use crate::error::Result;
use crate::filters::BloomFilter;

/// Hooks around each forwarded operation.
///
/// Every method receives the inner filter and by default just calls it.
pub trait FilterLayer<T: ?Sized> {
    /// Called for [`Filter::add`].
    fn add<F: Filter<T>>(&mut self, inner: &mut F, item: &T) -> bool {
        inner.add(item)
    }

    /// Called for [`Filter::add_bytes`].
    fn add_bytes<F: Filter<T>>(&mut self, inner: &mut F, bytes: &[u8]) -> bool {
        inner.add_bytes(bytes)
    }

    /// Called for [`Filter::contains`].
    fn contains<F: Filter<T>>(&self, inner: &F, item: &T) -> bool {
        inner.contains(item)
    }

    /// Called for [`Filter::contains_bytes`].
    fn contains_bytes<F: Filter<T>>(&self, inner: &F, bytes: &[u8]) -> bool {
        inner.contains_bytes(bytes)
    }

    /// Called for [`Filter::merge`].
    fn merge<F: Filter<T>>(&mut self, inner: &mut F, other: &BloomFilter<T>) -> Result<()> {
        inner.merge(other)
    }

    /// Called for [`Filter::intersect`].
    fn intersect<F: Filter<T>>(&mut self, inner: &mut F, other: &BloomFilter<T>) -> Result<()> {
        inner.intersect(other)
    }

    /// Called for [`Filter::clear`].
    fn clear<F: Filter<T>>(&mut self, inner: &mut F) {
        inner.clear();
    }

    /// Called for [`Filter::close`].
    fn close<F: Filter<T>>(&mut self, inner: &mut F) -> Result<()> {
        inner.close()
    }
}

/// Layer that forwards everything unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl<T: ?Sized> FilterLayer<T> for PassThrough {}

/// A filter that forwards to `F` through layer `L`.
#[derive(Debug, Clone)]
pub struct DelegatingFilter<F, L = PassThrough> {
    inner: F,
    layer: L,
}

impl<F> DelegatingFilter<F, PassThrough> {
    /// Wrap `inner` without any hooks.
    #[must_use]
    pub fn new(inner: F) -> Self {
        Self::with_layer(inner, PassThrough)
    }
}

impl<F, L> DelegatingFilter<F, L> {
    /// Wrap `inner` with `layer`.
    #[must_use]
    pub fn with_layer(inner: F, layer: L) -> Self {
        Self { inner, layer }
    }

    /// The wrapped filter.
    #[must_use]
    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Mutable access to the wrapped filter. Bypasses the layer.
    pub fn inner_mut(&mut self) -> &mut F {
        &mut self.inner
    }

    /// The layer.
    #[must_use]
    pub fn layer(&self) -> &L {
        &self.layer
    }

    /// Mutable access to the layer.
    pub fn layer_mut(&mut self) -> &mut L {
        &mut self.layer
    }

    /// Unwrap into the inner filter, dropping the layer.
    #[must_use]
    pub fn into_inner(self) -> F {
        self.inner
    }
}

impl<T, F, L> Filter<T> for DelegatingFilter<F, L>
where
    T: ?Sized,
    F: Filter<T>,
    L: FilterLayer<T>,
{
    fn add(&mut self, item: &T) -> bool {
        self.layer.add(&mut self.inner, item)
    }

    fn add_bytes(&mut self, bytes: &[u8]) -> bool {
        self.layer.add_bytes(&mut self.inner, bytes)
    }

    fn contains(&self, item: &T) -> bool {
        self.layer.contains(&self.inner, item)
    }

    fn contains_bytes(&self, bytes: &[u8]) -> bool {
        self.layer.contains_bytes(&self.inner, bytes)
    }

    fn merge(&mut self, other: &BloomFilter<T>) -> Result<()> {
        self.layer.merge(&mut self.inner, other)
    }

    fn intersect(&mut self, other: &BloomFilter<T>) -> Result<()> {
        self.layer.intersect(&mut self.inner, other)
    }

    fn clear(&mut self) {
        self.layer.clear(&mut self.inner);
    }

    fn close(&mut self) -> Result<()> {
        self.layer.close(&mut self.inner)
    }

    fn set_charset(&mut self, name: &str) -> Result<()> {
        self.inner.set_charset(name)
    }

    fn as_bloom(&self) -> &BloomFilter<T> {
        self.inner.as_bloom()
    }
}

/// Layer that counts adds which changed at least one bit.
///
/// The count is exact for adds made through the wrapper. After a merge or
/// intersection it is replaced by the core's cardinality estimate, since
/// the other side's history is unknown.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertionCounter {
    accepted: usize,
}

impl InsertionCounter {
    /// Adds that changed the filter.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.accepted
    }
}

impl<T: ?Sized> FilterLayer<T> for InsertionCounter {
    fn add<F: Filter<T>>(&mut self, inner: &mut F, item: &T) -> bool {
        let changed = inner.add(item);
        self.accepted += usize::from(changed);
        changed
    }

    fn add_bytes<F: Filter<T>>(&mut self, inner: &mut F, bytes: &[u8]) -> bool {
        let changed = inner.add_bytes(bytes);
        self.accepted += usize::from(changed);
        changed
    }

    fn merge<F: Filter<T>>(&mut self, inner: &mut F, other: &BloomFilter<T>) -> Result<()> {
        inner.merge(other)?;
        self.accepted = inner.as_bloom().estimated_cardinality();
        Ok(())
    }

    fn intersect<F: Filter<T>>(&mut self, inner: &mut F, other: &BloomFilter<T>) -> Result<()> {
        inner.intersect(other)?;
        self.accepted = inner.as_bloom().estimated_cardinality();
        Ok(())
    }

    fn clear<F: Filter<T>>(&mut self, inner: &mut F) {
        inner.clear();
        self.accepted = 0;
    }

    fn close<F: Filter<T>>(&mut self, inner: &mut F) -> Result<()> {
        self.accepted = 0;
        inner.close()
    }
}

/// A Bloom filter that tracks how many adds changed it.
pub type TrackedBloomFilter<T> = DelegatingFilter<BloomFilter<T>, InsertionCounter>;

impl<T: ?Sized> DelegatingFilter<BloomFilter<T>, InsertionCounter> {
    /// Wrap `inner` with a fresh [`InsertionCounter`].
    #[must_use]
    pub fn tracked(inner: BloomFilter<T>) -> Self {
        Self::with_layer(inner, InsertionCounter::default())
    }

    /// Adds that changed the filter.
    #[must_use]
    pub const fn insertions(&self) -> usize {
        self.layer.count()
    }

    /// False positive probability at the tracked insertion count.
    #[must_use]
    pub fn current_false_positive_probability(&self) -> f64 {
        self.inner.false_positive_probability(self.insertions())
    }
}
