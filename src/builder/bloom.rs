//! Builder for Bloom filters.
//!
//! # Type-State Pattern
//!
//! The builder can only be built once capacity and false positive
//! probability are both set:
//!
//! ```text
//! Initial ──expected_insertions()──▶ WithInsertions ──false_positive_probability()──▶ Complete ──build()──▶ BloomFilter
//! ```
//!
//! Backend, hash function and charset are optional and may be set in any
//! state.
//!
//! # Examples
//!
//! ```
//! use bloomkit::builder::BloomFilterBuilder;
//! use bloomkit::{Backend, BloomFilter};
//!
//! let filter: BloomFilter<str> = BloomFilterBuilder::new()
//!     .expected_insertions(10_000)
//!     .false_positive_probability(0.01)
//!     .backend(Backend::Compressed)
//!     .charset("UTF-16LE")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(filter.backend(), Backend::Compressed);
//! ```
//!
//! Invalid values are caught when building:
//!
//! ```
//! use bloomkit::builder::BloomFilterBuilder;
//! use bloomkit::BloomFilter;
//!
//! let result = BloomFilterBuilder::new()
//!     .expected_insertions(0)
//!     .false_positive_probability(0.01)
//!     .build::<str>();
//!
//! assert!(result.is_err());
//! ```

use crate::core::bitarray::Backend;
use crate::decompose::{Decompose, Decomposer, DefaultDecomposer, TextEncoding};
use crate::error::Result;
use crate::filters::BloomFilter;
use crate::hash::{default_hash_function, HashFunction};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Type-state marker: nothing set.
#[derive(Debug)]
pub struct Initial;

/// Type-state marker: capacity set.
#[derive(Debug)]
pub struct WithInsertions;

/// Type-state marker: capacity and false positive probability set.
#[derive(Debug)]
pub struct Complete;

/// Builder for [`BloomFilter`].
pub struct BloomFilterBuilder<State = Initial> {
    expected_insertions: usize,
    fpp: f64,
    backend: Backend,
    hasher: Option<Arc<dyn HashFunction>>,
    charset: Option<String>,
    _state: PhantomData<State>,
}

impl BloomFilterBuilder<Initial> {
    /// Start a builder with the dense backend and the default hash function.
    #[must_use]
    pub fn new() -> Self {
        Self {
            expected_insertions: 0,
            fpp: 0.0,
            backend: Backend::default(),
            hasher: None,
            charset: None,
            _state: PhantomData,
        }
    }

    /// Set the number of items the filter is sized for.
    #[must_use]
    pub fn expected_insertions(self, count: usize) -> BloomFilterBuilder<WithInsertions> {
        BloomFilterBuilder {
            expected_insertions: count,
            ..self.into_state()
        }
    }
}

impl Default for BloomFilterBuilder<Initial> {
    fn default() -> Self {
        Self::new()
    }
}

impl BloomFilterBuilder<WithInsertions> {
    /// Set the target false positive probability, in (0, 1).
    #[must_use]
    pub fn false_positive_probability(self, fpp: f64) -> BloomFilterBuilder<Complete> {
        BloomFilterBuilder {
            fpp,
            ..self.into_state()
        }
    }
}

impl<State> BloomFilterBuilder<State> {
    fn into_state<Next>(self) -> BloomFilterBuilder<Next> {
        BloomFilterBuilder {
            expected_insertions: self.expected_insertions,
            fpp: self.fpp,
            backend: self.backend,
            hasher: self.hasher,
            charset: self.charset,
            _state: PhantomData,
        }
    }

    /// Storage backend. Defaults to [`Backend::Dense`].
    #[must_use]
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Hash function. Defaults to [`Murmur3HashFunction`](crate::hash::Murmur3HashFunction).
    #[must_use]
    pub fn hash_function(mut self, hasher: Arc<dyn HashFunction>) -> Self {
        self.hasher = Some(hasher);
        self
    }

    /// Charset name for string encoding, validated on build.
    #[must_use]
    pub fn charset(mut self, name: impl Into<String>) -> Self {
        self.charset = Some(name.into());
        self
    }

    /// String encoding.
    #[must_use]
    pub fn encoding(self, encoding: TextEncoding) -> Self {
        self.charset(encoding.name())
    }
}

impl BloomFilterBuilder<Complete> {
    /// Build a filter using the [`DefaultDecomposer`].
    ///
    /// # Errors
    ///
    /// - [`BloomError::InvalidItemCount`](crate::BloomError::InvalidItemCount) if capacity is 0
    /// - [`BloomError::FalsePositiveRateOutOfBounds`](crate::BloomError::FalsePositiveRateOutOfBounds) if fpp is not in (0, 1)
    /// - [`BloomError::InvalidFilterSize`](crate::BloomError::InvalidFilterSize) if the size exceeds the backend's limit
    /// - [`BloomError::InvalidParameters`](crate::BloomError::InvalidParameters) for an unknown charset
    pub fn build<T: Decompose + ?Sized>(self) -> Result<BloomFilter<T>> {
        self.build_with(Arc::new(DefaultDecomposer))
    }

    /// Build a filter with a custom decomposer.
    ///
    /// # Errors
    ///
    /// Same as [`Self::build`].
    pub fn build_with<T: ?Sized>(self, decomposer: Arc<dyn Decomposer<T>>) -> Result<BloomFilter<T>> {
        self.build_with_metadata(decomposer).map(|(filter, _)| filter)
    }

    /// Build a filter and report the sizing that was chosen.
    ///
    /// # Errors
    ///
    /// Same as [`Self::build`].
    ///
    /// # Examples
    ///
    /// ```
    /// use bloomkit::builder::BloomFilterBuilder;
    /// use bloomkit::decompose::DefaultDecomposer;
    /// use bloomkit::BloomFilter;
    /// use std::sync::Arc;
    ///
    /// let (filter, metadata): (BloomFilter<u64>, _) = BloomFilterBuilder::new()
    ///     .expected_insertions(1_000)
    ///     .false_positive_probability(0.01)
    ///     .build_with_metadata(Arc::new(DefaultDecomposer))
    ///     .unwrap();
    ///
    /// assert_eq!(metadata.num_bits, filter.num_bits());
    /// assert!((metadata.bits_per_element - 9.586).abs() < 1e-9);
    /// ```
    #[allow(clippy::cast_precision_loss)]
    pub fn build_with_metadata<T: ?Sized>(
        self,
        decomposer: Arc<dyn Decomposer<T>>,
    ) -> Result<(BloomFilter<T>, BuiltFilterMetadata)> {
        let encoding = self
            .charset
            .as_deref()
            .map(str::parse::<TextEncoding>)
            .transpose()?
            .unwrap_or_default();
        let hasher = self.hasher.unwrap_or_else(default_hash_function);

        let mut filter = BloomFilter::with_parts(
            self.expected_insertions,
            self.fpp,
            self.backend,
            hasher,
            decomposer,
        )?;
        filter.set_encoding(encoding);

        let metadata = BuiltFilterMetadata {
            expected_insertions: self.expected_insertions,
            fpp: self.fpp,
            num_bits: filter.num_bits(),
            num_hashes: filter.num_hashes(),
            backend: self.backend,
            bits_per_element: filter.num_bits() as f64 / self.expected_insertions as f64,
        };
        Ok((filter, metadata))
    }
}

impl<State> fmt::Debug for BloomFilterBuilder<State> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BloomFilterBuilder")
            .field("expected_insertions", &self.expected_insertions)
            .field("fpp", &self.fpp)
            .field("backend", &self.backend)
            .field("hasher", &self.hasher.as_ref().map(|h| h.name()))
            .field("charset", &self.charset)
            .finish()
    }
}

/// Sizing chosen by [`BloomFilterBuilder::build_with_metadata`].
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltFilterMetadata {
    /// Capacity requested.
    pub expected_insertions: usize,
    /// False positive probability requested.
    pub fpp: f64,
    /// Bit count `m`.
    pub num_bits: usize,
    /// Hash count `k`.
    pub num_hashes: usize,
    /// Storage backend.
    pub backend: Backend,
    /// `m / n`.
    pub bits_per_element: f64,
}

impl fmt::Display for BuiltFilterMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={} fpp={} m={} k={} backend={} ({:.2} bits/element)",
            self.expected_insertions,
            self.fpp,
            self.num_bits,
            self.num_hashes,
            self.backend,
            self.bits_per_element
        )
    }
}
