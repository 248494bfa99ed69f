//! Serialization support, behind the `serde` feature.
//!
//! ```toml
//! [dependencies]
//! bloomkit = { version = "0.1", features = ["serde"] }
//! ```
//!
//! Filters are not serialized directly, because their hash function and
//! decomposer are trait objects. [`BloomFilter::snapshot`](crate::BloomFilter::snapshot)
//! exports a [`FilterSnapshot`] that works with any serde format, and
//! [`BloomFilter::from_snapshot`](crate::BloomFilter::from_snapshot) turns
//! one back into a filter.

pub mod snapshot;

pub use snapshot::{FilterSnapshot, SnapshotPayload, FORMAT_VERSION};
