//! Configuration for a predictability analysis.

use crate::error::{PretraceError, Result};
use serde::{Deserialize, Serialize};

/// Tunables of [`PredictabilityAnalysis`](super::PredictabilityAnalysis).
///
/// # Examples
///
/// ```
/// use pretrace::predictability::PredictabilityConfig;
///
/// let config = PredictabilityConfig::default()
///     .with_anchor(2)
///     .with_z_critical(2.58);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.significance_threshold, 0.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictabilityConfig {
    /// Index of the layout every other layout is aligned onto.
    pub anchor: usize,
    /// Multiplier of the standard deviation in the upper bound.
    pub z_critical: f64,
    /// A decision is significant when its upper bound is strictly below this.
    pub significance_threshold: f64,
    /// IRLS iteration cap per classifier fit.
    pub max_iter: usize,
    /// Relative deviance tolerance per classifier fit.
    pub tolerance: f64,
    /// Fit documents in parallel (only with the `parallel` feature).
    pub parallel: bool,
}

impl Default for PredictabilityConfig {
    fn default() -> Self {
        Self {
            anchor: 0,
            z_critical: 1.96,
            significance_threshold: 0.5,
            max_iter: 25,
            tolerance: 1e-8,
            parallel: true,
        }
    }
}

impl PredictabilityConfig {
    /// Sets the anchor layout index.
    #[must_use]
    pub fn with_anchor(mut self, anchor: usize) -> Self {
        self.anchor = anchor;
        self
    }

    /// Sets the upper-bound multiplier.
    #[must_use]
    pub fn with_z_critical(mut self, z: f64) -> Self {
        self.z_critical = z;
        self
    }

    /// Sets the significance threshold.
    #[must_use]
    pub fn with_significance_threshold(mut self, threshold: f64) -> Self {
        self.significance_threshold = threshold;
        self
    }

    /// Sets the IRLS iteration cap.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the IRLS deviance tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Enables or disables parallel fitting.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Checks every field against its allowed range.
    ///
    /// The anchor is range-checked later against the actual layout count.
    ///
    /// # Errors
    ///
    /// Returns [`PretraceError::InvalidConfig`] for the first bad field.
    pub fn validate(&self) -> Result<()> {
        if !self.z_critical.is_finite() || self.z_critical < 0.0 {
            return Err(PretraceError::invalid_config(
                "z_critical",
                self.z_critical,
                "finite and >= 0",
            ));
        }
        if !(self.significance_threshold > 0.0 && self.significance_threshold <= 1.0) {
            return Err(PretraceError::invalid_config(
                "significance_threshold",
                self.significance_threshold,
                "in (0, 1]",
            ));
        }
        if self.max_iter == 0 {
            return Err(PretraceError::invalid_config("max_iter", self.max_iter, ">0"));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(PretraceError::invalid_config(
                "tolerance",
                self.tolerance,
                "finite and > 0",
            ));
        }
        Ok(())
    }
}
