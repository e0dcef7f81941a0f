//! Document layouts produced by an upstream scaling step.
//!
//! A [`Layout`] assigns a 2D point to every document of a corpus for one
//! preprocessing configuration. A [`LayoutSet`] is the ordered collection of
//! layouts, one per configuration, validated so that every layout covers the
//! same documents exactly once.
//!
//! # Example
//!
//! ```
//! use pretrace::layout::{Layout, LayoutSet};
//!
//! let a = Layout::from_rows([("doc1", [0.0, 1.0]), ("doc2", [1.0, 0.0])]);
//! let b = Layout::from_rows([("doc2", [0.0, 1.0]), ("doc1", [-1.0, 0.0])]);
//! let set = LayoutSet::new(vec![a, b]).expect("same documents in both layouts");
//! assert_eq!(set.len(), 2);
//! assert_eq!(set.n_documents(), 2);
//! ```

use crate::error::{PretraceError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// A 2D coordinate pair `[x, y]`.
pub type Point = [f64; 2];

/// Maximum number of identifiers listed in a document-set mismatch error.
const MAX_REPORTED_IDS: usize = 5;

/// One document layout: document identifier to 2D point.
///
/// Deserialization rejects identifier and point columns of different length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LayoutColumns")]
pub struct Layout {
    documents: Vec<String>,
    points: Vec<Point>,
}

/// Unchecked wire form of a [`Layout`].
#[derive(Deserialize)]
struct LayoutColumns {
    documents: Vec<String>,
    points: Vec<Point>,
}

impl TryFrom<LayoutColumns> for Layout {
    type Error = PretraceError;

    fn try_from(raw: LayoutColumns) -> Result<Self> {
        if raw.documents.len() != raw.points.len() {
            return Err(PretraceError::DimensionMismatch {
                expected: format!("{} points", raw.documents.len()),
                actual: format!("{} points", raw.points.len()),
            });
        }
        Ok(Self {
            documents: raw.documents,
            points: raw.points,
        })
    }
}

impl Layout {
    /// Builds a layout from `(document, point)` rows in their given order.
    ///
    /// No validation happens here; [`LayoutSet::new`] checks uniqueness,
    /// finiteness and document-set agreement across layouts.
    #[must_use]
    pub fn from_rows<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = (S, Point)>,
        S: Into<String>,
    {
        let (documents, points) = rows
            .into_iter()
            .map(|(doc, point)| (doc.into(), point))
            .unzip();
        Self { documents, points }
    }

    /// Builds a layout from parallel identifier and coordinate columns.
    ///
    /// # Errors
    ///
    /// Returns an error if the three columns differ in length.
    pub fn from_columns(documents: Vec<String>, x: &[f64], y: &[f64]) -> Result<Self> {
        if x.len() != documents.len() || y.len() != documents.len() {
            return Err(PretraceError::DimensionMismatch {
                expected: format!("{} coordinates per axis", documents.len()),
                actual: format!("x={}, y={}", x.len(), y.len()),
            });
        }
        let points = x.iter().zip(y).map(|(&px, &py)| [px, py]).collect();
        Ok(Self { documents, points })
    }

    /// Number of documents in the layout.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if the layout holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Document identifiers in row order.
    #[must_use]
    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    /// Points in row order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Looks up the point of a document.
    #[must_use]
    pub fn get(&self, document: &str) -> Option<Point> {
        self.documents
            .iter()
            .position(|d| d == document)
            .map(|i| self.points[i])
    }

    /// Iterates over `(document, point)` rows.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Point)> + '_ {
        self.documents
            .iter()
            .map(String::as_str)
            .zip(self.points.iter().copied())
    }

    /// Returns a copy with rows stably sorted by document identifier.
    #[must_use]
    pub fn sorted_by_document(&self) -> Self {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| self.documents[a].cmp(&self.documents[b]));
        Self {
            documents: order.iter().map(|&i| self.documents[i].clone()).collect(),
            points: order.iter().map(|&i| self.points[i]).collect(),
        }
    }

    /// Returns this layout's points in the order of `documents`.
    ///
    /// This is the keyed join used by alignment: every requested identifier
    /// must be present, and the layout must not hold any extra documents.
    ///
    /// # Errors
    ///
    /// Returns [`PretraceError::DocumentSetMismatch`] if the identifier sets
    /// differ. `layout` is only used to label the error.
    pub fn points_for(&self, documents: &[String], layout: usize) -> Result<Vec<Point>> {
        let index: HashMap<&str, usize> = self
            .documents
            .iter()
            .enumerate()
            .map(|(i, d)| (d.as_str(), i))
            .collect();

        let joined: Option<Vec<Point>> = documents
            .iter()
            .map(|d| index.get(d.as_str()).map(|&i| self.points[i]))
            .collect();

        match joined {
            Some(points) if index.len() == documents.len() => Ok(points),
            _ => Err(self.mismatch_against(documents, layout)),
        }
    }

    fn mismatch_against(&self, reference: &[String], layout: usize) -> PretraceError {
        let ours: BTreeSet<&str> = self.documents.iter().map(String::as_str).collect();
        let theirs: BTreeSet<&str> = reference.iter().map(String::as_str).collect();
        PretraceError::DocumentSetMismatch {
            layout,
            missing: theirs
                .difference(&ours)
                .take(MAX_REPORTED_IDS)
                .map(|s| (*s).to_string())
                .collect(),
            unexpected: ours
                .difference(&theirs)
                .take(MAX_REPORTED_IDS)
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    fn validate(&self, layout: usize) -> Result<()> {
        if self.is_empty() {
            return Err(PretraceError::EmptyLayout { layout });
        }

        let mut seen = BTreeSet::new();
        for (doc, point) in self.iter() {
            if !seen.insert(doc) {
                return Err(PretraceError::DuplicateDocument {
                    layout,
                    document: doc.to_string(),
                });
            }
            if !point.iter().all(|v| v.is_finite()) {
                return Err(PretraceError::NonFiniteCoordinate {
                    layout,
                    document: doc.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// An ordered, validated sequence of layouts over one document set.
///
/// Deserialization goes through [`LayoutSet::new`], so a set read from JSON
/// is validated exactly like one built in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LayoutSetData")]
pub struct LayoutSet {
    layouts: Vec<Layout>,
}

/// Unchecked wire form of a [`LayoutSet`].
#[derive(Deserialize)]
struct LayoutSetData {
    layouts: Vec<Layout>,
}

impl TryFrom<LayoutSetData> for LayoutSet {
    type Error = PretraceError;

    fn try_from(raw: LayoutSetData) -> Result<Self> {
        Self::new(raw.layouts)
    }
}

impl LayoutSet {
    /// Validates and wraps a sequence of layouts.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than 2 layouts are given, if any layout is
    /// empty, has duplicate identifiers or non-finite coordinates, or if the
    /// layouts do not all cover the same documents.
    pub fn new(layouts: Vec<Layout>) -> Result<Self> {
        if layouts.len() < 2 {
            return Err(PretraceError::InsufficientLayouts {
                found: layouts.len(),
            });
        }

        for (i, layout) in layouts.iter().enumerate() {
            layout.validate(i)?;
        }

        let reference = layouts[0].sorted_by_document();
        for (i, layout) in layouts.iter().enumerate().skip(1) {
            layout.points_for(reference.documents(), i)?;
        }

        Ok(Self { layouts })
    }

    /// Number of layouts (preprocessing configurations).
    #[must_use]
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// Always false: a validated set holds at least 2 layouts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Number of documents shared by every layout.
    #[must_use]
    pub fn n_documents(&self) -> usize {
        self.layouts.first().map_or(0, Layout::len)
    }

    /// The layouts in configuration order.
    #[must_use]
    pub fn layouts(&self) -> &[Layout] {
        &self.layouts
    }

    /// Returns the layout at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Layout> {
        self.layouts.get(index)
    }
}
