//! Binomial generalized linear model (logistic regression).
//!
//! Fits `P(y = 1 | x) = σ(β₀ + xᵀβ)` by IRLS (Iteratively Reweighted Least
//! Squares), the standard GLM solver:
//!
//! - **Linear predictor**: η = β₀ + Xβ
//! - **Link**: logit, μ = 1 / (1 + e^(-η))
//! - **Variance**: V(μ) = μ(1 - μ)
//!
//! Convergence follows the usual deviance criterion
//! `|dev - dev_old| / (|dev| + 0.1) < tol`. A fit that hits the iteration cap
//! is *not* an error: the last estimate is kept and the returned
//! [`FitReport`] says so. Constant responses and perfectly separable data
//! are handled the same way; the solver simply runs towards the boundary.
//!
//! # Example
//!
//! ```
//! use pretrace::glm::LogisticRegression;
//! use pretrace::primitives::Matrix;
//!
//! let x = Matrix::from_vec(6, 1, vec![-3.0, -2.0, -1.0, 1.0, 2.0, 3.0])
//!     .expect("6x1 matrix");
//! let y = [0, 0, 1, 0, 1, 1];
//!
//! let mut model = LogisticRegression::new();
//! let report = model.fit(&x, &y).expect("valid training data");
//! assert!(report.converged);
//!
//! let predictions = model.predict(&x).expect("fitted model");
//! assert_eq!(predictions.len(), 6);
//! ```

use crate::error::{PretraceError, Result};
use crate::primitives::{Matrix, Vector};
use serde::{Deserialize, Serialize};

/// Linear predictor bound: |η| beyond this gives μ within machine epsilon of 0 or 1.
const MAX_ETA: f64 = 36.043_653_389_117_15;

/// μ this close to 0 or 1 counts as a boundary fit.
const BOUNDARY_EPS: f64 = 10.0 * f64::EPSILON;

/// Ridge added to X'WX relative to its largest diagonal entry.
///
/// Keeps the normal equations solvable when the design is rank deficient
/// (a document whose trajectory collapses to one point). Features are
/// centered first, so the ridge tracks the spread of the data and not its
/// distance from the origin.
const RIDGE_SCALE: f64 = 1e-10;

/// Outcome of a [`LogisticRegression::fit`] call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    /// IRLS iterations performed.
    pub iterations: usize,
    /// Whether the deviance criterion was met before `max_iter`.
    pub converged: bool,
    /// Residual deviance of the final estimate. The ridge makes this a
    /// slightly penalized value; on separable data it tends to 0 but never
    /// reaches it.
    pub deviance: f64,
    /// Some fitted probability is numerically 0 or 1 (separation).
    pub boundary: bool,
}

/// Logistic regression with intercept, fitted by IRLS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Maximum IRLS iterations
    max_iter: usize,
    /// Relative deviance tolerance
    tol: f64,
    /// Fitted coefficients (without intercept)
    coefficients: Option<Vec<f64>>,
    /// Intercept term
    intercept: Option<f64>,
}

fn sigmoid(eta: f64) -> f64 {
    1.0 / (1.0 + (-eta.clamp(-MAX_ETA, MAX_ETA)).exp())
}

fn binomial_deviance(y: &[u8], mu: &[f64]) -> f64 {
    -2.0 * y
        .iter()
        .zip(mu)
        .map(|(&yi, &m)| if yi == 1 { m.ln() } else { (1.0 - m).ln() })
        .sum::<f64>()
}

impl LogisticRegression {
    /// Creates a model with the conventional GLM defaults
    /// (25 iterations, tolerance 1e-8).
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_iter: 25,
            tol: 1e-8,
            coefficients: None,
            intercept: None,
        }
    }

    /// Sets the maximum number of IRLS iterations.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the relative deviance tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Returns the fitted coefficients (one per feature).
    #[must_use]
    pub fn coefficients(&self) -> Option<&[f64]> {
        self.coefficients.as_deref()
    }

    /// Returns the fitted intercept.
    #[must_use]
    pub fn intercept(&self) -> Option<f64> {
        self.intercept
    }

    /// Fits the model to features `x` (n × p) and binary labels `y` (n).
    ///
    /// # Errors
    ///
    /// Returns an error if shapes disagree, `x` is empty, a label is not
    /// 0/1, or the very first weighted least-squares solve fails. A solve
    /// failure in a later iteration keeps the previous estimate and reports
    /// the fit as not converged.
    pub fn fit(&mut self, x: &Matrix<f64>, y: &[u8]) -> Result<FitReport> {
        let n = x.n_rows();

        if n != y.len() {
            return Err(PretraceError::DimensionMismatch {
                expected: format!("{n} samples in X"),
                actual: format!("{} samples in y", y.len()),
            });
        }
        if n == 0 {
            return Err(PretraceError::DimensionMismatch {
                expected: "at least 1 sample".to_string(),
                actual: "0 samples".to_string(),
            });
        }
        if let Some((row, &value)) = y.iter().enumerate().find(|(_, v)| **v > 1) {
            return Err(PretraceError::InvalidLabel {
                decision: "response".to_string(),
                row,
                value,
            });
        }

        let means = x.column_means();
        let design = x.centered(&means)?.with_intercept();

        // Start from μ = (y + 0.5) / 2
        let mut mu: Vec<f64> = y.iter().map(|&v| (f64::from(v) + 0.5) / 2.0).collect();
        let mut eta: Vec<f64> = mu.iter().map(|&m| (m / (1.0 - m)).ln()).collect();
        let mut dev_old = binomial_deviance(y, &mu);

        let mut beta: Option<Vector<f64>> = None;
        let mut deviance = dev_old;
        let mut converged = false;
        let mut iterations = 0;

        for iter in 1..=self.max_iter {
            // Working response z = η + (y - μ) / μ'(η), weights W = μ(1 - μ)
            let weights: Vec<f64> = mu.iter().map(|&m| m * (1.0 - m)).collect();
            let z: Vec<f64> = (0..n)
                .map(|i| eta[i] + (f64::from(y[i]) - mu[i]) / weights[i])
                .collect();

            let mut xtwx = design.weighted_gram(&weights)?;
            let xtwz = design.weighted_cross(&weights, &z)?;
            xtwx.add_to_diagonal((xtwx.max_abs_diagonal() * RIDGE_SCALE).max(f64::MIN_POSITIVE));

            let beta_new = match xtwx.cholesky_solve(xtwz.as_slice()) {
                Ok(b) => b,
                Err(e) if beta.is_none() => return Err(e),
                Err(_) => break,
            };

            eta = design.matvec(beta_new.as_slice())?.into_vec();
            mu = eta.iter().map(|&e| sigmoid(e)).collect();

            beta = Some(beta_new);
            iterations = iter;
            deviance = binomial_deviance(y, &mu);

            if (deviance - dev_old).abs() / (deviance.abs() + 0.1) < self.tol {
                converged = true;
                break;
            }
            dev_old = deviance;
        }

        let beta =
            beta.ok_or_else(|| PretraceError::invalid_config("max_iter", self.max_iter, ">0"))?;
        let beta = beta.as_slice();
        // Undo the centering: β₀ = b₀ - Σ bⱼ x̄ⱼ
        let slopes = &beta[1..];
        let shift: f64 = slopes.iter().zip(&means).map(|(b, m)| b * m).sum();
        self.intercept = Some(beta[0] - shift);
        self.coefficients = Some(slopes.to_vec());

        let boundary = mu
            .iter()
            .any(|&m| m < BOUNDARY_EPS || m > 1.0 - BOUNDARY_EPS);

        Ok(FitReport {
            iterations,
            converged,
            deviance,
            boundary,
        })
    }

    /// Predicts P(y = 1) for each row of `x`.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or `x` has the wrong
    /// number of columns.
    pub fn predict_proba(&self, x: &Matrix<f64>) -> Result<Vector<f64>> {
        let coef = self.coefficients.as_ref().ok_or(PretraceError::NotFitted)?;
        let intercept = self.intercept.ok_or(PretraceError::NotFitted)?;

        if x.n_cols() != coef.len() {
            return Err(PretraceError::DimensionMismatch {
                expected: format!("{} features", coef.len()),
                actual: format!("{} columns in x", x.n_cols()),
            });
        }

        let probas = x
            .rows()
            .map(|r| sigmoid(intercept + r.iter().zip(coef).map(|(xi, b)| xi * b).sum::<f64>()))
            .collect();

        Ok(Vector::from_vec(probas))
    }

    /// Predicts class labels: 1 when P(y = 1) ≥ 0.5, else 0.
    ///
    /// A probability of exactly 0.5 rounds up to class 1.
    ///
    /// # Errors
    ///
    /// Same conditions as [`LogisticRegression::predict_proba`].
    pub fn predict(&self, x: &Matrix<f64>) -> Result<Vec<u8>> {
        let probas = self.predict_proba(x)?;
        Ok(probas
            .as_slice()
            .iter()
            .map(|&p| u8::from(p >= 0.5))
            .collect())
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "glm_tests.rs"]
mod tests;
