//! Per-document trajectories through the aligned layouts.
//!
//! A [`DocumentProfile`] is a `(n_layouts × 2)` matrix holding one
//! document's aligned coordinates in every layout, row `i` for layout `i`.
//! Building profiles is a pure reshape of [`AlignedLayouts`].

use crate::layout::Point;
use crate::primitives::{Matrix, Vector};
use crate::procrustes::AlignedLayouts;
use serde::{Deserialize, Serialize};

/// One document's coordinates across all layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentProfile {
    document: String,
    coordinates: Matrix<f64>,
}

impl DocumentProfile {
    /// Document identifier.
    #[must_use]
    pub fn document(&self) -> &str {
        &self.document
    }

    /// `(n_layouts × 2)` coordinate matrix; columns are x and y.
    #[must_use]
    pub fn coordinates(&self) -> &Matrix<f64> {
        &self.coordinates
    }

    /// Number of layouts in the trajectory.
    #[must_use]
    pub fn n_layouts(&self) -> usize {
        self.coordinates.n_rows()
    }

    /// The document's point in layout `layout`.
    ///
    /// # Panics
    ///
    /// Panics if `layout` is out of range.
    #[must_use]
    pub fn point(&self, layout: usize) -> Point {
        let row = self.coordinates.row(layout);
        [row[0], row[1]]
    }

    /// x coordinates across layouts.
    #[must_use]
    pub fn x(&self) -> Vector<f64> {
        self.coordinates.column(0)
    }

    /// y coordinates across layouts.
    #[must_use]
    pub fn y(&self) -> Vector<f64> {
        self.coordinates.column(1)
    }
}

/// Reshapes aligned layouts into one profile per document.
///
/// Profiles come out in the canonical (sorted) document order.
#[must_use]
pub fn build_profiles(aligned: &AlignedLayouts) -> Vec<DocumentProfile> {
    let n_layouts = aligned.n_layouts();

    aligned
        .documents()
        .iter()
        .enumerate()
        .map(|(j, document)| {
            let mut coordinates = Matrix::zeros(n_layouts, 2);
            for i in 0..n_layouts {
                let [x, y] = aligned.points(i)[j];
                coordinates.set(i, 0, x);
                coordinates.set(i, 1, y);
            }
            DocumentProfile {
                document: document.clone(),
                coordinates,
            }
        })
        .collect()
}
