//! Error types for bloomkit operations.
//!
//! Every fallible operation in the crate returns [`Result<T>`]. Failures are
//! local and deterministic: a rejected call never leaves a filter partially
//! modified, so callers can recover by choosing compatible parameters.
//!
//! # Error Propagation
//!
//! ```
//! use bloomkit::{BloomError, Result};
//! use bloomkit::core::params::{optimal_bit_count, optimal_hash_count};
//!
//! fn sizing(n: usize, fpp: f64) -> Result<(usize, usize)> {
//!     let m = optimal_bit_count(n, fpp)?;
//!     let k = optimal_hash_count(m, n)?;
//!     Ok((m, k))
//! }
//! # assert!(sizing(1000, 0.01).is_ok());
//! # assert!(matches!(sizing(0, 0.01), Err(BloomError::InvalidItemCount { .. })));
//! ```

#![allow(clippy::module_name_repetitions)]

use std::fmt;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BloomError>;

/// Errors that can occur while building, combining or releasing filters.
///
/// `Clone` and `PartialEq` are derived so tests can compare errors directly.
#[derive(Debug, Clone, PartialEq)]
pub enum BloomError {
    /// Configuration rejected at construction time.
    InvalidParameters {
        /// Human-readable description of what's invalid.
        message: String,
    },

    /// Target false positive probability outside the open interval (0, 1).
    FalsePositiveRateOutOfBounds {
        /// The rejected probability.
        fp_rate: f64,
    },

    /// Expected insertion count of zero.
    InvalidItemCount {
        /// The rejected count.
        count: usize,
    },

    /// Explicit hash count of zero.
    InvalidHashCount {
        /// The rejected count.
        count: usize,
    },

    /// Bit array size of zero, or larger than the chosen backend can address.
    InvalidFilterSize {
        /// The rejected size in bits.
        size: usize,
        /// Largest size the backend accepts.
        max: usize,
    },

    /// Set algebra between filters with different sizing parameters.
    IncompatibleFilters {
        /// Description of the mismatch.
        reason: String,
    },

    /// Bulk bit operation across two different storage backends.
    UnsupportedOperation {
        /// Name of the operation attempted.
        operation: String,
        /// Backend pairing that was rejected.
        variant: String,
    },

    /// Operation attempted after the filter released its storage.
    Closed {
        /// Name of the operation attempted.
        operation: String,
    },

    /// Snapshot could not be turned back into a filter.
    #[cfg(feature = "serde")]
    Snapshot {
        /// Description of what failed.
        message: String,
    },

    /// I/O failure from a storage backend.
    Io {
        /// The underlying error, rendered.
        message: String,
    },
}

impl fmt::Display for BloomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameters { message } => {
                write!(f, "Invalid Bloom filter parameters: {}.", message)
            }
            Self::FalsePositiveRateOutOfBounds { fp_rate } => {
                write!(
                    f,
                    "False positive rate {} is out of bounds. Must be in range (0, 1).",
                    fp_rate
                )
            }
            Self::InvalidItemCount { count } => {
                write!(
                    f,
                    "Invalid item count: {}. Expected insertions must be greater than 0.",
                    count
                )
            }
            Self::InvalidHashCount { count } => {
                write!(
                    f,
                    "Invalid hash function count: {}. Must be at least 1.",
                    count
                )
            }
            Self::InvalidFilterSize { size, max } => {
                write!(
                    f,
                    "Invalid filter size: {} bits. Must be in range [1, {}].",
                    size, max
                )
            }
            Self::IncompatibleFilters { reason } => {
                write!(
                    f,
                    "Cannot perform operation on incompatible filters: {}.",
                    reason
                )
            }
            Self::UnsupportedOperation { operation, variant } => {
                write!(
                    f,
                    "Operation '{}' is not supported between {} bit arrays.",
                    operation, variant
                )
            }
            Self::Closed { operation } => {
                write!(f, "Cannot run '{}' on a closed filter.", operation)
            }
            #[cfg(feature = "serde")]
            Self::Snapshot { message } => {
                write!(f, "Invalid filter snapshot: {}.", message)
            }
            Self::Io { message } => write!(f, "Bit array I/O error: {}.", message),
        }
    }
}

impl std::error::Error for BloomError {}

impl From<std::io::Error> for BloomError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

impl BloomError {
    /// Create an `InvalidParameters` error.
    ///
    /// ```
    /// use bloomkit::BloomError;
    ///
    /// let err = BloomError::invalid_parameters("unknown charset 'EBCDIC'");
    /// assert!(err.to_string().contains("EBCDIC"));
    /// ```
    #[must_use]
    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Self::InvalidParameters {
            message: message.into(),
        }
    }

    /// Create a `FalsePositiveRateOutOfBounds` error.
    #[must_use]
    pub fn fp_rate_out_of_bounds(fp_rate: f64) -> Self {
        Self::FalsePositiveRateOutOfBounds { fp_rate }
    }

    /// Create an `InvalidItemCount` error.
    #[must_use]
    pub fn invalid_item_count(count: usize) -> Self {
        Self::InvalidItemCount { count }
    }

    /// Create an `InvalidHashCount` error.
    #[must_use]
    pub fn invalid_hash_count(count: usize) -> Self {
        Self::InvalidHashCount { count }
    }

    /// Create an `InvalidFilterSize` error.
    #[must_use]
    pub fn invalid_filter_size(size: usize, max: usize) -> Self {
        Self::InvalidFilterSize { size, max }
    }

    /// Create an `IncompatibleFilters` error.
    #[must_use]
    pub fn incompatible_filters(reason: impl Into<String>) -> Self {
        Self::IncompatibleFilters {
            reason: reason.into(),
        }
    }

    /// Create an `UnsupportedOperation` error.
    #[must_use]
    pub fn unsupported_operation(operation: impl Into<String>, variant: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            operation: operation.into(),
            variant: variant.into(),
        }
    }

    /// Create a `Closed` error.
    #[must_use]
    pub fn closed(operation: impl Into<String>) -> Self {
        Self::Closed {
            operation: operation.into(),
        }
    }

    /// Create a `Snapshot` error.
    #[cfg(feature = "serde")]
    #[must_use]
    pub fn snapshot(message: impl Into<String>) -> Self {
        Self::Snapshot {
            message: message.into(),
        }
    }

    /// Whether the error came from set algebra against an unsuitable peer.
    #[must_use]
    pub fn is_combination_error(&self) -> bool {
        matches!(
            self,
            Self::IncompatibleFilters { .. } | Self::UnsupportedOperation { .. }
        )
    }
}
