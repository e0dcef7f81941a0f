//! Error types for pretrace operations.
//!
//! Every precondition on the inputs (layout count, document sets, decision
//! matrix shape and labels) is checked before any computation starts and
//! reported through [`PretraceError`]. Degenerate classifier fits are not
//! errors; they are reported as warnings on the analysis report.

use thiserror::Error;

/// Main error type for pretrace operations.
///
/// # Examples
///
/// ```
/// use pretrace::error::PretraceError;
///
/// let err = PretraceError::InsufficientLayouts { found: 1 };
/// assert!(err.to_string().contains("at least 2 layouts"));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PretraceError {
    /// Alignment needs an anchor plus at least one other layout.
    #[error("alignment requires at least 2 layouts, got {found}")]
    InsufficientLayouts {
        /// Number of layouts supplied
        found: usize,
    },

    /// The requested anchor index does not exist in the layout set.
    #[error("anchor index {anchor} out of range for {n_layouts} layouts")]
    AnchorOutOfRange {
        /// Requested anchor
        anchor: usize,
        /// Number of layouts supplied
        n_layouts: usize,
    },

    /// A layout holds no documents.
    #[error("layout {layout} contains no documents")]
    EmptyLayout {
        /// Layout index
        layout: usize,
    },

    /// A document identifier appears twice in the same layout.
    #[error("layout {layout} contains document '{document}' more than once")]
    DuplicateDocument {
        /// Layout index
        layout: usize,
        /// Offending identifier
        document: String,
    },

    /// A layout's document set differs from the anchor's.
    #[error(
        "layout {layout} does not match the anchor's documents: missing {missing:?}, unexpected {unexpected:?}"
    )]
    DocumentSetMismatch {
        /// Layout index
        layout: usize,
        /// Anchor documents absent from this layout (truncated)
        missing: Vec<String>,
        /// Documents in this layout that the anchor lacks (truncated)
        unexpected: Vec<String>,
    },

    /// A coordinate is NaN or infinite.
    #[error("layout {layout} has a non-finite coordinate for document '{document}'")]
    NonFiniteCoordinate {
        /// Layout index
        layout: usize,
        /// Offending identifier
        document: String,
    },

    /// Matrix/vector/table dimensions don't match for the operation.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// A decision matrix cell is not a binary indicator.
    #[error("decision '{decision}' row {row} has label {value}, expected 0 or 1")]
    InvalidLabel {
        /// Decision (column) name
        decision: String,
        /// Row (layout) index
        row: usize,
        /// Offending value
        value: u8,
    },

    /// The decision matrix has no columns.
    #[error("decision matrix must contain at least one decision")]
    EmptyDecisions,

    /// A decision name is empty or duplicated.
    #[error("invalid decision name '{name}': {reason}")]
    InvalidDecisionName {
        /// Offending name
        name: String,
        /// What is wrong with it
        reason: String,
    },

    /// Invalid configuration value.
    #[error("invalid config: {param} = {value}, expected {constraint}")]
    InvalidConfig {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Matrix is not positive definite and cannot be factorized.
    #[error("matrix is not positive definite: {0}")]
    SingularMatrix(String),

    /// A model was used before `fit` succeeded.
    #[error("model not fitted yet, call fit() first")]
    NotFitted,
}

impl PretraceError {
    /// Create a dimension mismatch error with descriptive context.
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(param: &str, value: impl ToString, constraint: &str) -> Self {
        Self::InvalidConfig {
            param: param.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, PretraceError>;
