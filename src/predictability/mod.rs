//! Predictability of preprocessing decisions from aligned document geometry.
//!
//! For every document and every decision, a logistic regression of the
//! decision's 0/1 label on the document's aligned `(x, y)` trajectory is
//! fitted, and its **in-sample** misclassification rate is recorded. There
//! is no holdout: the rate says how well position separates the
//! configurations a decision was on from those it was off, not how a
//! classifier would generalize. Rates are then aggregated per decision into
//! a mean, a sample standard deviation, an upper bound
//! `mean + z · sd` and a significance flag (`bound < threshold`).
//!
//! Degenerate fits (constant labels, separation, non-convergence) never
//! abort a run; they are reported as [`FitWarning`]s.
//!
//! # Example
//!
//! ```
//! use pretrace::prelude::*;
//!
//! let anchor = Layout::from_rows([("A", [0.0, 0.0]), ("B", [1.0, 0.0]), ("C", [0.0, 2.0])]);
//! let turned = Layout::from_rows([("C", [-2.0, 0.0]), ("A", [0.0, 0.0]), ("B", [0.0, 1.0])]);
//! let layouts = LayoutSet::new(vec![anchor.clone(), turned, anchor]).expect("valid layouts");
//!
//! let decisions = DecisionMatrix::from_columns(vec![("stem".to_string(), vec![0, 1, 1])])
//!     .expect("valid decisions");
//!
//! let analysis = PredictabilityAnalysis::new(PredictabilityConfig::default())
//!     .expect("valid config");
//! let report = analysis.run(&layouts, &decisions).expect("analysis runs");
//!
//! let stem = report.summary("stem").expect("stem summarized");
//! assert!((0.0..=1.0).contains(&stem.mean_classification_error));
//! ```

mod config;
mod report;

pub use config::PredictabilityConfig;
pub use report::{
    summarize_errors, DecisionSummary, ErrorTable, FitWarning, FitWarningKind,
    PredictabilityReport,
};

use crate::decision::DecisionMatrix;
use crate::error::{PretraceError, Result};
use crate::glm::{FitReport, LogisticRegression};
use crate::layout::LayoutSet;
use crate::primitives::Matrix;
use crate::procrustes::align_layouts;
use crate::profile::{build_profiles, DocumentProfile};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Outcome of one (document, decision) classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellFit {
    /// In-sample misclassification rate in `[0, 1]`.
    pub error: f64,
    /// Solver report; `None` when the fit failed and the majority class was used.
    pub report: Option<FitReport>,
    /// Degenerate-fit flag, if any.
    pub warning: Option<FitWarningKind>,
}

/// Majority class of `labels`; ties go to class 1.
fn majority_class(labels: &[u8]) -> u8 {
    let ones = labels.iter().filter(|&&l| l == 1).count();
    u8::from(2 * ones >= labels.len())
}

/// Fits one logistic regression of `labels` on a document's trajectory and
/// scores it on the same rows (in-sample).
///
/// If the solver cannot produce any estimate, every layout is predicted as
/// the majority class and the cell is flagged [`FitWarningKind::FitFailed`].
///
/// # Errors
///
/// Returns an error if `labels` does not have one entry per layout, holds a
/// value other than 0/1, or `config.max_iter` is zero.
pub fn misclassification_rate(
    profile: &DocumentProfile,
    labels: &[u8],
    config: &PredictabilityConfig,
) -> Result<CellFit> {
    let n = profile.n_layouts();
    if labels.len() != n {
        return Err(PretraceError::dimension_mismatch(
            "labels per layout",
            n,
            labels.len(),
        ));
    }

    let x = profile.coordinates();
    let mut model = LogisticRegression::new()
        .with_max_iter(config.max_iter)
        .with_tolerance(config.tolerance);

    let (predictions, report) = match model.fit(x, labels) {
        Ok(report) => (model.predict(x)?, Some(report)),
        Err(PretraceError::SingularMatrix(_)) => (vec![majority_class(labels); n], None),
        Err(e) => return Err(e),
    };

    let mismatches = predictions
        .iter()
        .zip(labels)
        .filter(|(p, l)| p != l)
        .count();
    let error = mismatches as f64 / n as f64;

    let constant = labels.windows(2).all(|w| w[0] == w[1]);
    let warning = match report {
        _ if constant => Some(FitWarningKind::ConstantLabel),
        None => Some(FitWarningKind::FitFailed),
        Some(r) if !r.converged => Some(FitWarningKind::NotConverged),
        Some(r) if r.boundary => Some(FitWarningKind::Separation),
        Some(_) => None,
    };

    Ok(CellFit {
        error,
        report,
        warning,
    })
}

/// Runs the alignment → profile → classifier → aggregation pipeline.
#[derive(Debug, Clone, Default)]
pub struct PredictabilityAnalysis {
    config: PredictabilityConfig,
}

impl PredictabilityAnalysis {
    /// Creates an analysis with a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PretraceError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: PredictabilityConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &PredictabilityConfig {
        &self.config
    }

    /// Runs the analysis.
    ///
    /// All inputs are validated before any fitting: the decision matrix must
    /// have one row per layout and the anchor must index a layout.
    ///
    /// # Errors
    ///
    /// Returns an error on any input-validation failure. Degenerate
    /// classifier fits are not errors; see [`PredictabilityReport::warnings`].
    #[instrument(
        skip(self, layouts, decisions),
        fields(
            n_layouts = layouts.len(),
            n_documents = layouts.n_documents(),
            n_decisions = decisions.names().len()
        )
    )]
    pub fn run(
        &self,
        layouts: &LayoutSet,
        decisions: &DecisionMatrix,
    ) -> Result<PredictabilityReport> {
        self.config.validate()?;
        if decisions.n_rows() != layouts.len() {
            return Err(PretraceError::dimension_mismatch(
                "decision matrix rows (one per layout)",
                layouts.len(),
                decisions.n_rows(),
            ));
        }
        if self.config.anchor >= layouts.len() {
            return Err(PretraceError::AnchorOutOfRange {
                anchor: self.config.anchor,
                n_layouts: layouts.len(),
            });
        }

        let aligned = align_layouts(layouts, self.config.anchor)?;
        let profiles = build_profiles(&aligned);
        let cells = self.fit_grid(&profiles, decisions)?;

        let n_docs = profiles.len();
        let n_decisions = decisions.names().len();
        let mut values = Matrix::zeros(n_docs, n_decisions);
        let mut warnings = Vec::new();

        for (i, (profile, row)) in profiles.iter().zip(&cells).enumerate() {
            for (j, (decision, cell)) in decisions.names().iter().zip(row).enumerate() {
                values.set(i, j, cell.error);
                if let Some(kind) = cell.warning {
                    warn!(
                        "Degenerate fit for document '{}', decision '{}': {}",
                        profile.document(),
                        decision,
                        kind
                    );
                    warnings.push(FitWarning {
                        document: profile.document().to_string(),
                        decision: decision.clone(),
                        kind,
                    });
                }
            }
        }

        let document_errors = ErrorTable::new(
            aligned.documents().to_vec(),
            decisions.names().to_vec(),
            values,
        );
        let summaries = summarize_errors(
            &document_errors,
            self.config.z_critical,
            self.config.significance_threshold,
        )?;

        for s in &summaries {
            info!(
                "Decision '{}': mean classification error {:.4} (CE upper bound {:.4}, significant={})",
                s.decision, s.mean_classification_error, s.ce_upper_bound, s.significant
            );
        }

        warnings.sort_by(|a, b| {
            a.document
                .cmp(&b.document)
                .then_with(|| a.decision.cmp(&b.decision))
        });

        Ok(PredictabilityReport {
            summaries,
            document_errors,
            profiles,
            alignments: aligned.diagnostics().to_vec(),
            warnings,
        })
    }

    /// Fits every (document, decision) cell. Rows follow `profiles`, columns
    /// follow the decision matrix.
    fn fit_grid(
        &self,
        profiles: &[DocumentProfile],
        decisions: &DecisionMatrix,
    ) -> Result<Vec<Vec<CellFit>>> {
        #[cfg(feature = "parallel")]
        if self.config.parallel {
            return profiles
                .par_iter()
                .map(|profile| self.fit_document(profile, decisions))
                .collect();
        }

        profiles
            .iter()
            .map(|profile| self.fit_document(profile, decisions))
            .collect()
    }

    fn fit_document(
        &self,
        profile: &DocumentProfile,
        decisions: &DecisionMatrix,
    ) -> Result<Vec<CellFit>> {
        decisions
            .iter()
            .map(|(name, labels)| {
                misclassification_rate(profile, labels, &self.config).map_err(|e| match e {
                    PretraceError::InvalidLabel { row, value, .. } => {
                        PretraceError::InvalidLabel {
                            decision: name.to_string(),
                            row,
                            value,
                        }
                    }
                    other => other,
                })
            })
            .collect()
    }
}

/// Runs a [`PredictabilityAnalysis`] with the default configuration.
///
/// # Errors
///
/// See [`PredictabilityAnalysis::run`].
pub fn assess_predictability(
    layouts: &LayoutSet,
    decisions: &DecisionMatrix,
) -> Result<PredictabilityReport> {
    PredictabilityAnalysis::default().run(layouts, decisions)
}

#[cfg(test)]
#[path = "predictability_tests.rs"]
mod tests;
