//! bloomkit: Bloom filters with pluggable hashing, decomposition and storage.
//!
//! A Bloom filter is a space-efficient probabilistic set. It may report an
//! item that was never added (a **false positive**) but never misses an item
//! that was (no **false negatives**).
//!
//! # Quick Start
//!
//! ```
//! use bloomkit::{Backend, BloomFilter};
//!
//! // 10,000 items at a 1% false positive probability
//! let mut filter = BloomFilter::<str>::new(10_000, 0.01, Backend::Dense).unwrap();
//!
//! filter.add("hello");
//! filter.add("world");
//!
//! assert!(filter.contains("hello"));
//! assert!(!filter.contains("goodbye"));
//! ```
//!
//! # Pipeline
//!
//! ```text
//! item ─▶ Decomposer ─▶ bytes ─▶ HashFunction ─▶ (h1, h2) ─▶ DoubleHashing ─▶ k indices ─▶ BitStorage
//! ```
//!
//! Every stage is replaceable:
//!
//! - [`decompose::Decomposer`]: how a value becomes bytes. Closures work.
//! - [`hash::HashFunction`]: MurmurHash3 x64-128 by default, XXH3 with the `xxhash` feature.
//! - [`Backend`]: a dense word vector, or a roaring bitmap for sparse filters.
//!
//! # Combining Filters
//!
//! Filters with the same bit count, hash count and backend can be merged
//! (union) and intersected, and tested for a possible subset relation:
//!
//! ```
//! use bloomkit::{Backend, BloomFilter};
//!
//! let mut a = BloomFilter::<str>::new(1_000, 0.01, Backend::Dense).unwrap();
//! let mut b = BloomFilter::<str>::new(1_000, 0.01, Backend::Dense).unwrap();
//! a.add("foo");
//! b.add("bar");
//!
//! a.merge(&b).unwrap();
//! assert!(a.contains("bar"));
//! assert!(b.maybe_subset_of(&a).unwrap());
//! ```
//!
//! # Features
//!
//! - `xxhash` (default): [`hash::XxHashFunction`]
//! - `concurrent` (default): [`sync::SharedBloomFilter`]
//! - `serde`: snapshot export and import
//!
//! # Logging
//!
//! The crate emits [`tracing`] events (construction, set algebra, close)
//! and never installs a subscriber.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Sizing, bit storage and the filter trait
pub mod core;

/// Value-to-bytes decomposition
pub mod decompose;

/// Error types and result aliases
pub mod error;

/// Filter implementations
pub mod filters;

/// Hash functions and index generation
pub mod hash;

/// Type-safe filter builder
pub mod builder;

/// Lock-protected shared filter (requires `concurrent` feature)
#[cfg(feature = "concurrent")]
#[cfg_attr(docsrs, doc(cfg(feature = "concurrent")))]
pub mod sync;

/// Snapshot export and import (requires `serde` feature)
#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub mod serde_support;

pub use crate::core::bitarray::Backend;
pub use crate::core::filter::Filter;
pub use builder::BloomFilterBuilder;
pub use error::{BloomError, Result};
pub use filters::{BloomFilter, DelegatingFilter, TrackedBloomFilter};

#[cfg(feature = "concurrent")]
pub use sync::SharedBloomFilter;

#[cfg(feature = "serde")]
pub use serde_support::FilterSnapshot;

/// Prelude module for convenient imports.
///
/// # Examples
///
/// ```
/// use bloomkit::prelude::*;
///
/// let mut filter = BloomFilter::<u64>::new(1000, 0.01, Backend::Compressed).unwrap();
/// filter.add(&42);
/// assert!(filter.contains(&42));
/// ```
pub mod prelude {
    pub use crate::builder::BloomFilterBuilder;
    pub use crate::core::bitarray::Backend;
    pub use crate::core::filter::Filter;
    pub use crate::decompose::{ByteSink, Decompose, Decomposer, DefaultDecomposer, TextEncoding};
    pub use crate::error::{BloomError, Result};
    pub use crate::filters::{
        BloomFilter, DelegatingFilter, FilterLayer, InsertionCounter, TrackedBloomFilter,
    };
    pub use crate::hash::{HashFunction, Murmur3HashFunction};

    #[cfg(feature = "xxhash")]
    pub use crate::hash::XxHashFunction;

    #[cfg(feature = "concurrent")]
    pub use crate::sync::SharedBloomFilter;

    #[cfg(feature = "serde")]
    pub use crate::serde_support::FilterSnapshot;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use std::sync::Arc;

    #[test]
    fn test_prelude_imports() {
        let mut filter = BloomFilter::<str>::new(100, 0.01, Backend::Dense).unwrap();
        filter.add("test");
        assert!(filter.contains("test"));
    }

    #[test]
    fn test_trait_usage() {
        fn exercise<F: Filter<String>>(filter: &mut F) {
            filter.add(&"item".to_string());
            assert!(filter.contains(&"item".to_string()));
        }

        let mut filter = BloomFilter::<String>::new(100, 0.01, Backend::Dense).unwrap();
        exercise(&mut filter);

        let mut tracked = TrackedBloomFilter::tracked(filter.clone());
        exercise(&mut tracked);
    }

    #[test]
    fn test_builder() {
        let filter: BloomFilter<str> = BloomFilterBuilder::new()
            .expected_insertions(1000)
            .false_positive_probability(0.01)
            .build()
            .unwrap();
        assert!(filter.is_empty());
    }

    #[cfg(feature = "xxhash")]
    #[test]
    fn test_xxhash_filter() {
        let mut filter = BloomFilter::<str>::with_parts(
            1_000,
            0.01,
            Backend::Compressed,
            Arc::new(XxHashFunction::new()),
            Arc::new(DefaultDecomposer),
        )
        .unwrap();
        filter.add("fast");
        assert!(filter.contains("fast"));
        assert_eq!(filter.hash_function().name(), "XXH3");
    }

    #[cfg(feature = "concurrent")]
    #[test]
    fn test_shared_filter_across_threads() {
        let filter = Arc::new(SharedBloomFilter::<str>::new(1000, 0.01, Backend::Dense).unwrap());
        let clone = Arc::clone(&filter);
        std::thread::spawn(move || {
            clone.add("thread_item");
        })
        .join()
        .unwrap();
        assert!(filter.contains("thread_item"));
    }
}
