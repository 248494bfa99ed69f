//! Hash functions and bit index generation.
//!
//! # Module Organization
//!
//! ```text
//! hash/
//! ├── hasher.rs      - HashFunction trait
//! ├── murmur3.rs     - MurmurHash3 x64-128 (default)
//! ├── xxhash.rs      - XXH3 (feature "xxhash")
//! └── strategies.rs  - Double hashing
//! ```
//!
//! # Choosing a hash function
//!
//! | Function | Single-valued | Notes |
//! |----------|---------------|-------|
//! | [`Murmur3HashFunction`] | no | 128-bit digest, default |
//! | [`XxHashFunction`] | yes | Fastest on long keys |
//!
//! Filters that will be merged or intersected must use the same hash
//! function and seed.

pub mod hasher;
pub mod murmur3;
pub mod strategies;
#[cfg(feature = "xxhash")]
pub mod xxhash;

pub use hasher::HashFunction;
pub use murmur3::Murmur3HashFunction;
pub use strategies::DoubleHashing;
#[cfg(feature = "xxhash")]
pub use xxhash::XxHashFunction;

use std::sync::Arc;

/// Shared handle to the default hash function.
#[must_use]
pub fn default_hash_function() -> Arc<dyn HashFunction> {
    Arc::new(Murmur3HashFunction::new())
}
