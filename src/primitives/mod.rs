//! Core compute primitives (Vector, Matrix).
//!
//! Row-major containers used by the logistic solver and the document
//! profiles. All numeric work in this crate runs in `f64`.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
