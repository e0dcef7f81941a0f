//! Orthogonal Procrustes alignment of document layouts.
//!
//! Each layout comes out of an independent scaling run, so its axes are only
//! defined up to rotation, reflection and translation. Alignment maps every
//! layout into the frame of one anchor layout with the orthogonal transform
//! that minimizes the summed squared distance between matching documents.
//! Scale is never changed.
//!
//! # Algorithm
//!
//! For anchor points `X` and moving points `Y` (rows matched by document):
//!
//! 1. Center both sets on their centroids `x̄`, `ȳ`.
//! 2. Cross-product `M = Ycᵀ Xc` (2×2).
//! 3. Pick the orthogonal `Q` maximizing `tr(Qᵀ M)`. In 2D this is the best
//!    of two closed forms: a rotation with angle `atan2(m10 - m01, m00 + m11)`
//!    and a reflection with angle `atan2(m01 + m10, m00 - m11)`.
//! 4. Aligned points are `(y - ȳ) Q + x̄`.
//!
//! # Example
//!
//! ```
//! use pretrace::procrustes::fit_procrustes;
//!
//! let anchor = [[0.0, 0.0], [1.0, 0.0], [0.0, 2.0]];
//! // Same shape rotated by 90 degrees and shifted.
//! let moving = [[5.0, 5.0], [5.0, 6.0], [3.0, 5.0]];
//! let fit = fit_procrustes(&anchor, &moving).expect("matching point sets");
//! for (a, m) in anchor.iter().zip(&moving) {
//!     let p = fit.apply(*m);
//!     assert!((p[0] - a[0]).abs() < 1e-9 && (p[1] - a[1]).abs() < 1e-9);
//! }
//! assert!(fit.residual_ss < 1e-12);
//! ```

use crate::error::{PretraceError, Result};
use crate::layout::{LayoutSet, Point};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// An orthogonal transform `p ↦ p · rotation + translation` (row vectors).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcrustesFit {
    /// Orthogonal 2×2 matrix, row-major.
    pub rotation: [[f64; 2]; 2],
    /// Offset added after rotation.
    pub translation: Point,
    /// True if `rotation` has determinant -1.
    pub reflected: bool,
    /// Sum of squared distances between aligned and reference points.
    pub residual_ss: f64,
}

impl ProcrustesFit {
    /// The identity transform with zero residual.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            rotation: [[1.0, 0.0], [0.0, 1.0]],
            translation: [0.0, 0.0],
            reflected: false,
            residual_ss: 0.0,
        }
    }

    /// Applies the transform to one point.
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        let r = &self.rotation;
        [
            p[0] * r[0][0] + p[1] * r[1][0] + self.translation[0],
            p[0] * r[0][1] + p[1] * r[1][1] + self.translation[1],
        ]
    }
}

fn centroid(points: &[Point]) -> Point {
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p[0], sy + p[1]));
    [sx / n, sy / n]
}

/// Fits the orthogonal transform that best maps `moving` onto `reference`.
///
/// Rows are matched by position. When a proper rotation and a reflection fit
/// equally well the rotation is chosen. Degenerate inputs (all points equal)
/// give a pure translation.
///
/// # Errors
///
/// Returns an error if the point sets are empty or differ in length.
pub fn fit_procrustes(reference: &[Point], moving: &[Point]) -> Result<ProcrustesFit> {
    if reference.len() != moving.len() {
        return Err(PretraceError::dimension_mismatch(
            "reference points",
            reference.len(),
            moving.len(),
        ));
    }
    if reference.is_empty() {
        return Err(PretraceError::DimensionMismatch {
            expected: "at least 1 point".to_string(),
            actual: "0 points".to_string(),
        });
    }

    let x_bar = centroid(reference);
    let y_bar = centroid(moving);

    let mut m = [[0.0_f64; 2]; 2];
    for (x, y) in reference.iter().zip(moving) {
        let xc = [x[0] - x_bar[0], x[1] - x_bar[1]];
        let yc = [y[0] - y_bar[0], y[1] - y_bar[1]];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell += yc[i] * xc[j];
            }
        }
    }

    let rot_score = (m[0][0] + m[1][1]).hypot(m[1][0] - m[0][1]);
    let ref_score = (m[0][0] - m[1][1]).hypot(m[0][1] + m[1][0]);

    let (rotation, reflected) = if rot_score >= ref_score {
        let theta = (m[1][0] - m[0][1]).atan2(m[0][0] + m[1][1]);
        let (s, c) = theta.sin_cos();
        ([[c, -s], [s, c]], false)
    } else {
        let theta = (m[0][1] + m[1][0]).atan2(m[0][0] - m[1][1]);
        let (s, c) = theta.sin_cos();
        ([[c, s], [s, -c]], true)
    };

    // t = x̄ - ȳ·Q
    let translation = [
        x_bar[0] - (y_bar[0] * rotation[0][0] + y_bar[1] * rotation[1][0]),
        x_bar[1] - (y_bar[0] * rotation[0][1] + y_bar[1] * rotation[1][1]),
    ];

    let mut fit = ProcrustesFit {
        rotation,
        translation,
        reflected,
        residual_ss: 0.0,
    };
    fit.residual_ss = reference
        .iter()
        .zip(moving)
        .map(|(x, y)| {
            let p = fit.apply(*y);
            (p[0] - x[0]).powi(2) + (p[1] - x[1]).powi(2)
        })
        .sum();

    Ok(fit)
}

/// Per-layout record of the transform applied during alignment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentDiagnostics {
    /// Index of the layout in the layout set.
    pub layout: usize,
    /// True for the anchor layout, whose transform is the identity.
    pub is_anchor: bool,
    /// The fitted transform.
    pub fit: ProcrustesFit,
}

/// All layouts expressed in the anchor's frame, rows in canonical order.
///
/// The canonical document order is the anchor's identifiers sorted
/// ascending. `points(i)[j]` is document `j`'s aligned position in layout `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedLayouts {
    anchor: usize,
    documents: Vec<String>,
    layouts: Vec<Vec<Point>>,
    diagnostics: Vec<AlignmentDiagnostics>,
}

impl AlignedLayouts {
    /// Index of the anchor layout.
    #[must_use]
    pub fn anchor(&self) -> usize {
        self.anchor
    }

    /// Canonical document order.
    #[must_use]
    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    /// Number of layouts.
    #[must_use]
    pub fn n_layouts(&self) -> usize {
        self.layouts.len()
    }

    /// Aligned points of layout `layout`, in canonical document order.
    ///
    /// # Panics
    ///
    /// Panics if `layout` is out of range.
    #[must_use]
    pub fn points(&self, layout: usize) -> &[Point] {
        &self.layouts[layout]
    }

    /// Transform applied to each layout, in layout order.
    #[must_use]
    pub fn diagnostics(&self) -> &[AlignmentDiagnostics] {
        &self.diagnostics
    }
}

/// Aligns every layout of `set` onto the layout at index `anchor`.
///
/// The anchor's rows are sorted by document identifier; that order is used
/// for every output layout. Each other layout is joined to it by identifier
/// and superimposed with [`fit_procrustes`]. The anchor keeps its original
/// coordinates.
///
/// # Errors
///
/// Returns an error if `anchor` is out of range or a layout's documents
/// differ from the anchor's.
pub fn align_layouts(set: &LayoutSet, anchor: usize) -> Result<AlignedLayouts> {
    let anchor_layout = set.get(anchor).ok_or(PretraceError::AnchorOutOfRange {
        anchor,
        n_layouts: set.len(),
    })?;

    let sorted_anchor = anchor_layout.sorted_by_document();
    let documents = sorted_anchor.documents().to_vec();
    let reference = sorted_anchor.points();

    let mut layouts = Vec::with_capacity(set.len());
    let mut diagnostics = Vec::with_capacity(set.len());

    for (i, layout) in set.layouts().iter().enumerate() {
        if i == anchor {
            layouts.push(reference.to_vec());
            diagnostics.push(AlignmentDiagnostics {
                layout: i,
                is_anchor: true,
                fit: ProcrustesFit::identity(),
            });
            continue;
        }

        let moving = layout.points_for(&documents, i)?;
        let fit = fit_procrustes(reference, &moving)?;
        debug!(
            "Aligned layout {} onto anchor {}: residual_ss={:.6e}, reflected={}",
            i, anchor, fit.residual_ss, fit.reflected
        );

        layouts.push(moving.iter().map(|&p| fit.apply(p)).collect());
        diagnostics.push(AlignmentDiagnostics {
            layout: i,
            is_anchor: false,
            fit,
        });
    }

    Ok(AlignedLayouts {
        anchor,
        documents,
        layouts,
        diagnostics,
    })
}

#[cfg(test)]
#[path = "procrustes_tests.rs"]
mod tests;
