//! Core types: sizing, bit storage, and the filter trait.
//!
//! # Module Organization
//!
//! ```text
//! core/
//! ├── params.rs      - Sizing and probability formulas
//! ├── bitarray.rs    - BitArray trait, Backend, BitStorage
//! ├── dense.rs       - Word-packed bit array
//! ├── compressed.rs  - Roaring-bitmap bit array
//! └── filter.rs      - Filter trait
//! ```
//!
//! # Examples
//!
//! ```
//! use bloomkit::core::params::filter_params;
//!
//! let (m, k) = filter_params(1_000, 0.01).unwrap();
//! assert_eq!((m, k), (9586, 7));
//! ```

pub mod bitarray;
pub mod compressed;
pub mod dense;
pub mod filter;
pub mod params;

pub use bitarray::{Backend, BitArray, BitStorage};
pub use compressed::CompressedBitArray;
pub use dense::DenseBitArray;
pub use filter::Filter;
pub use params::{
    bits_per_element, estimate_cardinality, false_positive_probability, filter_params,
    optimal_bit_count, optimal_hash_count,
};
