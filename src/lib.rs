//! Pretrace: how predictable are text-preprocessing decisions from document
//! geometry?
//!
//! Given several 2D layouts of the same corpus (one per preprocessing
//! configuration) and a binary decision matrix recording which
//! preprocessing decisions each configuration applied, pretrace:
//!
//! 1. aligns every layout onto an anchor layout by orthogonal Procrustes
//!    superimposition (rotation, reflection, translation, no scaling),
//! 2. reshapes the aligned layouts into one trajectory per document,
//! 3. fits a logistic regression of each decision on each document's
//!    trajectory and aggregates the in-sample misclassification rates per
//!    decision.
//!
//! A decision whose error upper bound stays below 0.5 moves documents
//! consistently: position alone predicts whether it was applied.
//!
//! # Quick Start
//!
//! ```
//! use pretrace::prelude::*;
//!
//! let base = Layout::from_rows([
//!     ("doc1", [0.0, 0.0]),
//!     ("doc2", [4.0, 0.0]),
//!     ("doc3", [0.0, 4.0]),
//!     ("doc4", [4.0, 4.0]),
//! ]);
//! let stemmed = Layout::from_rows([
//!     ("doc1", [10.0, 10.0]),
//!     ("doc2", [4.0, 0.0]),
//!     ("doc3", [0.0, 4.0]),
//!     ("doc4", [4.0, 4.0]),
//! ]);
//! let layouts = LayoutSet::new(vec![base.clone(), base, stemmed.clone(), stemmed])
//!     .expect("same documents in every layout");
//! let decisions = DecisionMatrix::from_columns(vec![("stem".to_string(), vec![0, 0, 1, 1])])
//!     .expect("binary column, one row per layout");
//!
//! let report = assess_predictability(&layouts, &decisions).expect("valid inputs");
//! assert_eq!(report.significant_decisions(), vec!["stem"]);
//! println!("{report}");
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`layout`]: Document layouts and validated layout sets
//! - [`decision`]: Binary decision matrix
//! - [`procrustes`]: Orthogonal Procrustes alignment onto an anchor
//! - [`profile`]: Per-document trajectories across layouts
//! - [`glm`]: Logistic regression fitted by IRLS
//! - [`stats`]: Mean, sample standard deviation, upper bound
//! - [`predictability`]: Per-document classifiers and per-decision summaries

pub mod decision;
pub mod error;
pub mod glm;
pub mod layout;
pub mod predictability;
pub mod prelude;
pub mod primitives;
pub mod procrustes;
pub mod profile;
pub mod stats;

pub use decision::DecisionMatrix;
pub use error::{PretraceError, Result};
pub use layout::{Layout, LayoutSet, Point};
pub use predictability::{
    assess_predictability, PredictabilityAnalysis, PredictabilityConfig, PredictabilityReport,
};
pub use primitives::{Matrix, Vector};
