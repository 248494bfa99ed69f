//! Filter implementations.
//!
//! - [`BloomFilter`]: the core filter over one bit array
//! - [`DelegatingFilter`]: wraps another filter and forwards through a [`FilterLayer`]
//!
//! # Choosing a Backend
//!
//! | Backend | Memory | Best for |
//! |---------|--------|----------|
//! | [`Backend::Dense`](crate::Backend::Dense) | `m / 8` bytes, always | Filters that will fill up |
//! | [`Backend::Compressed`](crate::Backend::Compressed) | Grows with set bits | Large, sparsely filled filters |
//!
//! Both backends produce identical bits for identical inputs. Filters can
//! only be combined with filters on the same backend.

pub mod bloom;
pub mod delegating;

pub use bloom::BloomFilter;
pub use delegating::{
    DelegatingFilter, FilterLayer, InsertionCounter, PassThrough, TrackedBloomFilter,
};
