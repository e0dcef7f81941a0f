//! Decision matrix: which preprocessing decisions were active per layout.
//!
//! Row `i` corresponds to layout `i` of the [`LayoutSet`](crate::layout::LayoutSet);
//! each named column is one binary preprocessing decision (stemming,
//! stopword removal, ...). Cells are `0` (not applied) or `1` (applied).
//!
//! # Example
//!
//! ```
//! use pretrace::decision::DecisionMatrix;
//!
//! let decisions = DecisionMatrix::from_columns(vec![
//!     ("stem".to_string(), vec![0, 1, 1]),
//!     ("lowercase".to_string(), vec![1, 0, 1]),
//! ]).expect("valid binary columns");
//! assert_eq!(decisions.shape(), (3, 2));
//! assert_eq!(decisions.column("stem"), Some(&[0, 1, 1][..]));
//! ```

use crate::error::{PretraceError, Result};
use serde::{Deserialize, Serialize};

/// Named binary columns, one row per layout.
///
/// Deserialization goes through [`DecisionMatrix::from_columns`]; a stored
/// `n_rows` is ignored and recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DecisionColumns")]
pub struct DecisionMatrix {
    names: Vec<String>,
    columns: Vec<Vec<u8>>,
    n_rows: usize,
}

/// Unchecked wire form of a [`DecisionMatrix`].
#[derive(Deserialize)]
struct DecisionColumns {
    names: Vec<String>,
    columns: Vec<Vec<u8>>,
}

impl TryFrom<DecisionColumns> for DecisionMatrix {
    type Error = PretraceError;

    fn try_from(raw: DecisionColumns) -> Result<Self> {
        if raw.names.len() != raw.columns.len() {
            return Err(PretraceError::DimensionMismatch {
                expected: format!("{} columns", raw.names.len()),
                actual: format!("{} columns", raw.columns.len()),
            });
        }
        Self::from_columns(raw.names.into_iter().zip(raw.columns).collect())
    }
}

impl DecisionMatrix {
    /// Creates a decision matrix from named columns.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no columns, a name is empty or
    /// duplicated, columns differ in length, or a cell is not 0/1.
    pub fn from_columns(columns: Vec<(String, Vec<u8>)>) -> Result<Self> {
        if columns.is_empty() {
            return Err(PretraceError::EmptyDecisions);
        }

        let n_rows = columns[0].1.len();
        let mut names: Vec<String> = Vec::with_capacity(columns.len());
        let mut data = Vec::with_capacity(columns.len());

        for (name, column) in columns {
            if name.is_empty() {
                return Err(PretraceError::InvalidDecisionName {
                    name,
                    reason: "decision names cannot be empty".to_string(),
                });
            }
            if names.contains(&name) {
                return Err(PretraceError::InvalidDecisionName {
                    name,
                    reason: "duplicate decision name".to_string(),
                });
            }
            if column.len() != n_rows {
                return Err(PretraceError::DimensionMismatch {
                    expected: format!("{n_rows} rows in every decision"),
                    actual: format!("{} rows in '{name}'", column.len()),
                });
            }
            if let Some((row, &value)) = column.iter().enumerate().find(|(_, v)| **v > 1) {
                return Err(PretraceError::InvalidLabel {
                    decision: name,
                    row,
                    value,
                });
            }
            names.push(name);
            data.push(column);
        }

        Ok(Self {
            names,
            columns: data,
            n_rows,
        })
    }

    /// Creates a decision matrix from row-major data and column names.
    ///
    /// # Errors
    ///
    /// Returns an error if a row's width differs from the number of names,
    /// or under the same conditions as [`DecisionMatrix::from_columns`].
    pub fn from_rows(names: Vec<String>, rows: &[Vec<u8>]) -> Result<Self> {
        if let Some(bad) = rows.iter().find(|r| r.len() != names.len()) {
            return Err(PretraceError::DimensionMismatch {
                expected: format!("{} decisions per row", names.len()),
                actual: format!("{} values", bad.len()),
            });
        }
        let columns: Vec<(String, Vec<u8>)> = names
            .into_iter()
            .enumerate()
            .map(|(j, name)| (name, rows.iter().map(|r| r[j]).collect()))
            .collect();
        Self::from_columns(columns)
    }

    /// Returns (rows, decisions).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.names.len())
    }

    /// Number of rows (layouts).
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Decision names in column order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Labels of a decision by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[u8]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|j| self.columns[j].as_slice())
    }

    /// Iterates over `(name, labels)` in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }
}

#[cfg(test)]
impl DecisionMatrix {
    /// Builds a matrix without any checks.
    pub(crate) fn from_columns_unchecked(columns: Vec<(String, Vec<u8>)>) -> Self {
        let n_rows = columns.first().map_or(0, |(_, c)| c.len());
        let (names, columns) = columns.into_iter().unzip();
        Self {
            names,
            columns,
            n_rows,
        }
    }
}
