//! Thread-safe filter access.
//!
//! [`BloomFilter`](crate::BloomFilter) takes `&mut self` for every
//! mutation and has no internal locking. [`SharedBloomFilter`] puts it
//! behind a `parking_lot::RwLock` so it can be shared through an `Arc`.

pub mod shared;

pub use shared::SharedBloomFilter;
