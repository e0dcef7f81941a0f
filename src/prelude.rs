//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use pretrace::prelude::*;
//! ```

pub use crate::decision::DecisionMatrix;
pub use crate::error::{PretraceError, Result};
pub use crate::glm::{FitReport, LogisticRegression};
pub use crate::layout::{Layout, LayoutSet, Point};
pub use crate::predictability::{
    assess_predictability, misclassification_rate, summarize_errors, DecisionSummary, ErrorTable,
    FitWarning, FitWarningKind, PredictabilityAnalysis, PredictabilityConfig,
    PredictabilityReport,
};
pub use crate::primitives::{Matrix, Vector};
pub use crate::procrustes::{align_layouts, fit_procrustes, AlignedLayouts, ProcrustesFit};
pub use crate::profile::{build_profiles, DocumentProfile};
