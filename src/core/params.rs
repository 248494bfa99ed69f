//! Optimal parameter calculation for Bloom filters.
//!
//! Given:
//! - `n`: expected number of insertions
//! - `ε`: target false positive probability
//!
//! Optimal parameters:
//! - `m = ⌈-n × ln(ε) / (ln 2)²⌉` (bits in filter)
//! - `k = max(1, round((m/n) × ln 2))` (number of hash functions)
//!
//! Expected false positive probability after `n` insertions:
//! - `p = (1 - e^(-kn/m))^k`
//!
//! Sizing runs once, when a filter is constructed. The resulting `m` and `k`
//! are fixed for the lifetime of the filter.
//!
//! # References
//!
//! - Bloom, Burton H. (1970). "Space/Time Trade-offs in Hash Coding with Allowable Errors"
//! - Kirsch & Mitzenmacher (2006). "Less Hashing, Same Performance: Building a Better Bloom Filter"

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

use crate::error::{BloomError, Result};
use std::f64::consts::LN_2;

/// (ln 2)² ≈ 0.4804530139182014
const LN2_SQUARED: f64 = LN_2 * LN_2;

/// Minimum number of hash functions.
pub const MIN_HASH_FUNCTIONS: usize = 1;

fn validate_fp_rate(fp_rate: f64) -> Result<()> {
    // NaN fails both comparisons, so test the accepted range instead.
    if fp_rate > 0.0 && fp_rate < 1.0 {
        Ok(())
    } else {
        Err(BloomError::fp_rate_out_of_bounds(fp_rate))
    }
}

/// Calculate the optimal number of bits for `n` insertions at probability `fp_rate`.
///
/// # Errors
///
/// - [`BloomError::InvalidItemCount`] if `n == 0`
/// - [`BloomError::FalsePositiveRateOutOfBounds`] if `fp_rate` is not in (0, 1)
/// - [`BloomError::InvalidParameters`] if the result does not fit in `usize`
///
/// # Examples
///
/// ```
/// use bloomkit::core::params::optimal_bit_count;
///
/// assert_eq!(optimal_bit_count(1000, 0.01).unwrap(), 9586);
/// ```
pub fn optimal_bit_count(n: usize, fp_rate: f64) -> Result<usize> {
    if n == 0 {
        return Err(BloomError::invalid_item_count(n));
    }
    validate_fp_rate(fp_rate)?;

    let m = (-(n as f64) * fp_rate.ln() / LN2_SQUARED).ceil();

    if !m.is_finite() || m >= usize::MAX as f64 {
        return Err(BloomError::invalid_parameters(format!(
            "calculated filter size {:.0} exceeds usize::MAX",
            m
        )));
    }

    // n > 0 and fp_rate < 1 keep the product strictly positive, so m >= 1.
    Ok((m as usize).max(1))
}

/// Calculate the optimal number of hash functions for `m` bits and `n` insertions.
///
/// # Errors
///
/// - [`BloomError::InvalidFilterSize`] if `m == 0`
/// - [`BloomError::InvalidItemCount`] if `n == 0`
///
/// # Examples
///
/// ```
/// use bloomkit::core::params::optimal_hash_count;
///
/// assert_eq!(optimal_hash_count(9586, 1000).unwrap(), 7);
/// assert_eq!(optimal_hash_count(1, 1000).unwrap(), 1);
/// ```
pub fn optimal_hash_count(m: usize, n: usize) -> Result<usize> {
    if m == 0 {
        return Err(BloomError::invalid_filter_size(m, usize::MAX));
    }
    if n == 0 {
        return Err(BloomError::invalid_item_count(n));
    }

    let k = ((m as f64 / n as f64) * LN_2).round() as usize;
    Ok(k.max(MIN_HASH_FUNCTIONS))
}

/// Calculate `(m, k)` for `n` insertions at probability `fp_rate`.
///
/// # Errors
///
/// Same conditions as [`optimal_bit_count`].
pub fn filter_params(n: usize, fp_rate: f64) -> Result<(usize, usize)> {
    let m = optimal_bit_count(n, fp_rate)?;
    let k = optimal_hash_count(m, n)?;
    Ok((m, k))
}

/// Theoretical false positive probability of an `m`-bit, `k`-hash filter
/// holding `inserted` items.
///
/// Returns `0.0` for an empty filter and is clamped to `[0, 1]`.
///
/// # Examples
///
/// ```
/// use bloomkit::core::params::false_positive_probability;
///
/// let p = false_positive_probability(9586, 7, 1000);
/// assert!((p - 0.01).abs() < 0.001);
/// assert_eq!(false_positive_probability(9586, 7, 0), 0.0);
/// ```
#[must_use]
pub fn false_positive_probability(m: usize, k: usize, inserted: usize) -> f64 {
    if inserted == 0 || m == 0 {
        return 0.0;
    }

    let k_f64 = k as f64;
    let exponent = -(k_f64 * inserted as f64) / m as f64;
    (1.0 - exponent.exp()).powf(k_f64).clamp(0.0, 1.0)
}

/// Bits needed per element to reach `fp_rate` at optimal `k`.
///
/// # Errors
///
/// Returns [`BloomError::FalsePositiveRateOutOfBounds`] if `fp_rate` is not in (0, 1).
pub fn bits_per_element(fp_rate: f64) -> Result<f64> {
    validate_fp_rate(fp_rate)?;
    Ok(-fp_rate.ln() / LN2_SQUARED)
}

/// Estimate how many distinct items produced `set_bits` of `m` bits with `k` hashes.
///
/// Uses the Swamidass-Baldi estimator `n ≈ -(m/k) × ln(1 - X/m)`.
/// A saturated filter reports `usize::MAX`.
#[must_use]
pub fn estimate_cardinality(m: usize, k: usize, set_bits: usize) -> usize {
    if set_bits == 0 || m == 0 || k == 0 {
        return 0;
    }
    if set_bits >= m {
        return usize::MAX;
    }

    let m_f64 = m as f64;
    let fill = set_bits as f64 / m_f64;
    (-(m_f64 / k as f64) * (1.0 - fill).ln()).round() as usize
}
