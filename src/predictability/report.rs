//! Result tables of a predictability analysis.

use crate::error::Result;
use crate::primitives::{Matrix, Vector};
use crate::procrustes::AlignmentDiagnostics;
use crate::profile::DocumentProfile;
use crate::stats::{mean, sample_std, upper_bound};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a classifier fit was flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FitWarningKind {
    /// The decision has the same label in every layout.
    ConstantLabel,
    /// The solver could not produce any estimate; the majority class was used.
    FitFailed,
    /// IRLS stopped at the iteration cap.
    NotConverged,
    /// Fitted probabilities reached 0 or 1 (perfect separation).
    Separation,
}

impl fmt::Display for FitWarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::ConstantLabel => "decision label is constant across layouts",
            Self::FitFailed => "classifier fit failed, majority class used",
            Self::NotConverged => "classifier did not converge",
            Self::Separation => "fitted probabilities numerically 0 or 1",
        };
        f.write_str(text)
    }
}

/// A degenerate fit for one (document, decision) cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitWarning {
    /// Document identifier
    pub document: String,
    /// Decision name
    pub decision: String,
    /// What went wrong
    pub kind: FitWarningKind,
}

/// Per-document × per-decision misclassification rates.
///
/// Rows follow the canonical (sorted) document order, columns follow the
/// decision matrix's column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorTable {
    documents: Vec<String>,
    decisions: Vec<String>,
    values: Matrix<f64>,
}

impl ErrorTable {
    pub(crate) fn new(documents: Vec<String>, decisions: Vec<String>, values: Matrix<f64>) -> Self {
        Self {
            documents,
            decisions,
            values,
        }
    }

    /// (documents, decisions)
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        self.values.shape()
    }

    /// Row labels.
    #[must_use]
    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    /// Column labels.
    #[must_use]
    pub fn decisions(&self) -> &[String] {
        &self.decisions
    }

    /// Error rate of one cell.
    #[must_use]
    pub fn get(&self, document: &str, decision: &str) -> Option<f64> {
        let i = self.documents.iter().position(|d| d == document)?;
        let j = self.decisions.iter().position(|d| d == decision)?;
        Some(self.values.get(i, j))
    }

    /// Error rates of one decision across documents.
    #[must_use]
    pub fn column(&self, decision: &str) -> Option<Vector<f64>> {
        let j = self.decisions.iter().position(|d| d == decision)?;
        Some(self.values.column(j))
    }

    /// Error rates of one document across decisions.
    #[must_use]
    pub fn row(&self, document: &str) -> Option<&[f64]> {
        let i = self.documents.iter().position(|d| d == document)?;
        Some(self.values.row(i))
    }

    /// The underlying (documents × decisions) matrix.
    #[must_use]
    pub fn values(&self) -> &Matrix<f64> {
        &self.values
    }
}

/// Aggregate predictability of one decision across documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionSummary {
    /// Decision name
    pub decision: String,
    /// Mean misclassification rate
    pub mean_classification_error: f64,
    /// Sample standard deviation of the rates (NaN for a single document)
    pub classification_error_sd: f64,
    /// `mean + z · sd`
    #[serde(rename = "CE_upper_bound")]
    pub ce_upper_bound: f64,
    /// Upper bound strictly below the significance threshold
    pub significant: bool,
}

impl DecisionSummary {
    /// Aggregates one decision's per-document error rates.
    ///
    /// A NaN bound (single document) is never significant.
    ///
    /// # Errors
    ///
    /// Returns an error if `errors` is empty.
    pub fn from_errors(decision: &str, errors: &[f64], z: f64, threshold: f64) -> Result<Self> {
        let m = mean(errors)?;
        let sd = sample_std(errors)?;
        let bound = upper_bound(m, sd, z);
        Ok(Self {
            decision: decision.to_string(),
            mean_classification_error: m,
            classification_error_sd: sd,
            ce_upper_bound: bound,
            significant: bound < threshold,
        })
    }
}

/// Aggregates every column of an error table.
///
/// # Errors
///
/// Returns an error if the table has no documents.
pub fn summarize_errors(
    table: &ErrorTable,
    z: f64,
    threshold: f64,
) -> Result<Vec<DecisionSummary>> {
    table
        .decisions()
        .iter()
        .enumerate()
        .map(|(j, decision)| {
            let column = table.values().column(j);
            DecisionSummary::from_errors(decision, column.as_slice(), z, threshold)
        })
        .collect()
}

/// Everything a predictability analysis produces.
///
/// Error rates are **in-sample**: each classifier is scored on the same
/// layouts it was fitted to. They measure how well document position
/// separates a decision's on/off configurations, not how well a classifier
/// would generalize to unseen configurations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictabilityReport {
    pub(crate) summaries: Vec<DecisionSummary>,
    pub(crate) document_errors: ErrorTable,
    pub(crate) profiles: Vec<DocumentProfile>,
    pub(crate) alignments: Vec<AlignmentDiagnostics>,
    pub(crate) warnings: Vec<FitWarning>,
}

impl PredictabilityReport {
    /// One summary per decision, in decision-matrix column order.
    #[must_use]
    pub fn summaries(&self) -> &[DecisionSummary] {
        &self.summaries
    }

    /// Summary of one decision by name.
    #[must_use]
    pub fn summary(&self, decision: &str) -> Option<&DecisionSummary> {
        self.summaries.iter().find(|s| s.decision == decision)
    }

    /// Names of decisions flagged significant.
    #[must_use]
    pub fn significant_decisions(&self) -> Vec<&str> {
        self.summaries
            .iter()
            .filter(|s| s.significant)
            .map(|s| s.decision.as_str())
            .collect()
    }

    /// Per-document × per-decision error rates.
    #[must_use]
    pub fn document_errors(&self) -> &ErrorTable {
        &self.document_errors
    }

    /// Aligned trajectories, one per document.
    #[must_use]
    pub fn profiles(&self) -> &[DocumentProfile] {
        &self.profiles
    }

    /// Transform applied to each layout.
    #[must_use]
    pub fn alignments(&self) -> &[AlignmentDiagnostics] {
        &self.alignments
    }

    /// Degenerate fits, sorted by document then decision.
    #[must_use]
    pub fn warnings(&self) -> &[FitWarning] {
        &self.warnings
    }
}

impl fmt::Display for PredictabilityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .summaries
            .iter()
            .map(|s| s.decision.len())
            .max()
            .unwrap_or(0)
            .max("decision".len());

        writeln!(
            f,
            "{:<width$}  {:>25}  {:>23}  {:>14}  {:>11}",
            "decision",
            "mean_classification_error",
            "classification_error_sd",
            "CE_upper_bound",
            "significant",
        )?;
        for s in &self.summaries {
            writeln!(
                f,
                "{:<width$}  {:>25.4}  {:>23.4}  {:>14.4}  {:>11}",
                s.decision,
                s.mean_classification_error,
                s.classification_error_sd,
                s.ce_upper_bound,
                s.significant,
            )?;
        }
        Ok(())
    }
}
