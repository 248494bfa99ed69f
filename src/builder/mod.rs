//! Builder pattern for filter construction.
//!
//! Builders use the type-state pattern so that forgetting a required
//! parameter is a compile error, while out-of-range values are reported
//! at build time.
//!
//! # Examples
//!
//! ```
//! use bloomkit::builder::BloomFilterBuilder;
//! use bloomkit::BloomFilter;
//!
//! let filter: BloomFilter<str> = BloomFilterBuilder::new()
//!     .expected_insertions(10_000)
//!     .false_positive_probability(0.01)
//!     .build()
//!     .unwrap();
//! assert!(filter.is_empty());
//! ```
//!
//! Skipping a required step does not compile:
//!
//! ```compile_fail
//! use bloomkit::builder::BloomFilterBuilder;
//!
//! let filter = BloomFilterBuilder::new()
//!     .false_positive_probability(0.01)
//!     .build::<str>();
//! ```

pub mod bloom;

pub use bloom::{BloomFilterBuilder, BuiltFilterMetadata, Complete, Initial, WithInsertions};
