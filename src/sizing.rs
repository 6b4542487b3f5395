//! Sizing math for Bloom filters.
//!
//! Given the expected number of elements `n` and a target false positive rate `p`, these
//! functions derive the number of bits `m` and the number of hash rounds `k`:
//!
//! - `m = ceil(n * ln(p) / ln(1 / 2^ln(2)))`
//! - `k = round(ln(2) * m / n)`
//!
//! The false positive rate after inserting `n` elements is approximated by
//! `(1 - e^(-k * n / m))^k`.
use std::f64::consts::LN_2;

use crate::error::{Error, Result};

/// Calculate the number of bits needed for a filter that holds `capacity` elements with the
/// given false positive rate.
///
/// The result is rounded up, so rounding never makes the realized error rate worse than
/// requested.
///
/// # Examples
/// ```
/// use simplebloom::sizing::calculate_space;
///
/// assert_eq!(calculate_space(1000, 0.001).unwrap(), 14378);
/// ```
///
/// Returns [`Error::InvalidArgument`] if `capacity` is 0, if `error_rate` is not in `(0, 1)` or
/// if the result does not fit into `usize`.
pub fn calculate_space(capacity: usize, error_rate: f64) -> Result<usize> {
    check_capacity(capacity)?;
    check_error_rate(error_rate)?;

    let m = ((capacity as f64) * error_rate.ln() / (1. / 2f64.powf(LN_2)).ln()).ceil();
    if !(m.is_finite() && m >= 1. && m < usize::MAX as f64) {
        return Err(Error::InvalidArgument(format!(
            "bit count ({}) for capacity={} and error_rate={} is out of range",
            m, capacity, error_rate
        )));
    }

    Ok(m as usize)
}

/// Calculate the number of hash rounds that minimizes the false positive rate of a filter with
/// `bit_count` bits holding `capacity` elements.
///
/// The result is at least 1.
///
/// Returns [`Error::InvalidArgument`] if `capacity` or `bit_count` is 0.
pub fn calculate_hash_count(capacity: usize, bit_count: usize) -> Result<usize> {
    check_capacity(capacity)?;
    if bit_count == 0 {
        return Err(Error::InvalidArgument(
            "bit_count (0) must be greater than 0".to_owned(),
        ));
    }

    let k = (LN_2 * (bit_count as f64) / (capacity as f64)).round() as usize;
    Ok(k.max(1))
}

/// Approximate false positive rate of a filter with `bit_count` bits and `hash_rounds` rounds
/// after `count` insertions.
///
/// Monotonically increasing in `count`; 0 for an empty filter.
pub fn estimate_fp_rate(bit_count: usize, hash_rounds: usize, count: usize) -> f64 {
    if bit_count == 0 {
        return 1.;
    }

    let m = bit_count as f64;
    let k = hash_rounds as f64;
    let n = count as f64;
    (1. - (-k * n / m).exp()).powf(k)
}

fn check_capacity(capacity: usize) -> Result<()> {
    if capacity == 0 {
        return Err(Error::InvalidArgument(
            "capacity (0) must be greater than 0".to_owned(),
        ));
    }
    Ok(())
}

pub(crate) fn check_error_rate(error_rate: f64) -> Result<()> {
    // also rejects NaN
    if !((error_rate > 0.) && (error_rate < 1.)) {
        return Err(Error::InvalidArgument(format!(
            "error_rate ({}) must be greater than 0 and smaller than 1",
            error_rate
        )));
    }
    Ok(())
}
