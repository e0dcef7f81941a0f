//! Descriptive statistics over per-document misclassification rates.
//!
//! # Examples
//!
//! ```
//! use pretrace::stats::{mean, sample_std, upper_bound};
//!
//! let errors = [0.2, 0.4, 0.3];
//! let m = mean(&errors).expect("non-empty");
//! let sd = sample_std(&errors).expect("non-empty");
//! assert!((m - 0.3).abs() < 1e-12);
//! assert!((sd - 0.1).abs() < 1e-12);
//! assert!((upper_bound(m, sd, 1.96) - 0.496).abs() < 1e-12);
//! ```

use crate::error::{PretraceError, Result};

/// Arithmetic mean.
///
/// # Errors
///
/// Returns an error if `values` is empty.
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(PretraceError::DimensionMismatch {
            expected: "at least 1 value".to_string(),
            actual: "0 values".to_string(),
        });
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (denominator `n - 1`).
///
/// A single value has no sample spread; the result is NaN.
///
/// # Errors
///
/// Returns an error if `values` is empty.
pub fn sample_std(values: &[f64]) -> Result<f64> {
    let m = mean(values)?;
    let n = values.len();
    if n < 2 {
        return Ok(f64::NAN);
    }
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Ok((ss / (n - 1) as f64).sqrt())
}

/// Normal-approximation upper bound `mean + z · sd`.
#[must_use]
pub fn upper_bound(mean: f64, sd: f64, z: f64) -> f64 {
    mean + z * sd
}
