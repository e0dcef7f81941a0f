//! Dense row-major matrix.

use super::Vector;
use crate::error::{PretraceError, Result};
use serde::{Deserialize, Serialize};

/// A dense 2D matrix stored row by row.
///
/// # Examples
///
/// ```
/// use pretrace::primitives::Matrix;
///
/// let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("2x3 data");
/// assert_eq!(m.shape(), (2, 3));
/// assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Copy> Matrix<T> {
    /// Wraps row-major `data` as a `rows × cols` matrix.
    ///
    /// # Errors
    ///
    /// Returns [`PretraceError::DimensionMismatch`] if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(PretraceError::DimensionMismatch {
                expected: format!("{rows}x{cols} = {} values", rows * cols),
                actual: format!("{} values", data.len()),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// (rows, cols)
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.cols
    }

    fn offset(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.cols, "index out of bounds");
        row * self.cols + col
    }

    /// Element at (`row`, `col`).
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[self.offset(row, col)]
    }

    /// Overwrites the element at (`row`, `col`).
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        let at = self.offset(row, col);
        self.data[at] = value;
    }

    /// Row `row` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    #[must_use]
    pub fn row(&self, row: usize) -> &[T] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Iterator over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.rows).map(move |i| self.row(i))
    }

    /// Column `col`, copied out.
    #[must_use]
    pub fn column(&self, col: usize) -> Vector<T> {
        Vector::from_vec(self.rows().map(|r| r[col]).collect())
    }

    /// Row-major storage.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl Matrix<f64> {
    /// A `rows × cols` matrix of zeros.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// The design matrix `[1 X]`: a leading column of ones, then `self`.
    #[must_use]
    pub fn with_intercept(&self) -> Self {
        let data = self
            .rows()
            .flat_map(|r| std::iter::once(1.0).chain(r.iter().copied()))
            .collect();
        Self {
            rows: self.rows,
            cols: self.cols + 1,
            data,
        }
    }

    /// Mean of each column (NaN for a matrix without rows).
    #[must_use]
    pub fn column_means(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.cols];
        for r in self.rows() {
            for (s, &x) in sums.iter_mut().zip(r) {
                *s += x;
            }
        }
        let n = self.rows as f64;
        sums.into_iter().map(|s| s / n).collect()
    }

    /// A copy with `shift[j]` subtracted from every entry of column `j`.
    ///
    /// # Errors
    ///
    /// Returns an error if `shift.len() != n_cols`.
    pub fn centered(&self, shift: &[f64]) -> Result<Self> {
        if shift.len() != self.cols {
            return Err(PretraceError::dimension_mismatch("column shifts", self.cols, shift.len()));
        }
        let data = self
            .rows()
            .flat_map(|r| r.iter().zip(shift).map(|(x, s)| x - s))
            .collect();
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// `self · v`
    ///
    /// # Errors
    ///
    /// Returns an error if `v.len() != n_cols`.
    pub fn matvec(&self, v: &[f64]) -> Result<Vector<f64>> {
        if v.len() != self.cols {
            return Err(PretraceError::dimension_mismatch("vector length", self.cols, v.len()));
        }
        Ok(Vector::from_vec(
            self.rows()
                .map(|r| r.iter().zip(v).map(|(a, b)| a * b).sum())
                .collect(),
        ))
    }

    /// The weighted Gram matrix `Xᵀ diag(w) X` (`n_cols × n_cols`).
    ///
    /// # Errors
    ///
    /// Returns an error if `w.len() != n_rows`.
    pub fn weighted_gram(&self, w: &[f64]) -> Result<Self> {
        if w.len() != self.rows {
            return Err(PretraceError::dimension_mismatch("weights", self.rows, w.len()));
        }
        let p = self.cols;
        let mut gram = Self::zeros(p, p);
        for (r, &wi) in self.rows().zip(w) {
            for j in 0..p {
                let wx = wi * r[j];
                for k in j..p {
                    gram.data[j * p + k] += wx * r[k];
                }
            }
        }
        for j in 0..p {
            for k in 0..j {
                gram.data[j * p + k] = gram.data[k * p + j];
            }
        }
        Ok(gram)
    }

    /// The weighted cross product `Xᵀ diag(w) z` (length `n_cols`).
    ///
    /// # Errors
    ///
    /// Returns an error if `w` or `z` is not `n_rows` long.
    pub fn weighted_cross(&self, w: &[f64], z: &[f64]) -> Result<Vector<f64>> {
        if w.len() != self.rows || z.len() != self.rows {
            return Err(PretraceError::DimensionMismatch {
                expected: format!("{} weights and responses", self.rows),
                actual: format!("{} weights, {} responses", w.len(), z.len()),
            });
        }
        let mut out = vec![0.0; self.cols];
        for ((r, &wi), &zi) in self.rows().zip(w).zip(z) {
            for (o, &x) in out.iter_mut().zip(r) {
                *o += wi * x * zi;
            }
        }
        Ok(Vector::from_vec(out))
    }

    /// Largest absolute diagonal entry (0 for an empty matrix).
    #[must_use]
    pub fn max_abs_diagonal(&self) -> f64 {
        (0..self.rows.min(self.cols))
            .map(|i| self.get(i, i).abs())
            .fold(0.0, f64::max)
    }

    /// Adds `value` to every diagonal entry.
    pub fn add_to_diagonal(&mut self, value: f64) {
        for i in 0..self.rows.min(self.cols) {
            let at = self.offset(i, i);
            self.data[at] += value;
        }
    }

    /// Lower-triangular `L` with `self = L Lᵀ`.
    ///
    /// # Errors
    ///
    /// Returns [`PretraceError::SingularMatrix`] if the matrix is not square
    /// or not (numerically) positive definite.
    pub fn cholesky(&self) -> Result<Self> {
        let n = self.rows;
        if self.cols != n {
            return Err(PretraceError::SingularMatrix(format!(
                "Cholesky needs a square matrix, got {n}x{}",
                self.cols
            )));
        }

        let mut l = Self::zeros(n, n);
        for i in 0..n {
            for j in 0..=i {
                let dot: f64 = l.row(i)[..j].iter().zip(&l.row(j)[..j]).map(|(a, b)| a * b).sum();
                if i == j {
                    let pivot = self.get(i, i) - dot;
                    if !(pivot > 0.0 && pivot.is_finite()) {
                        return Err(PretraceError::SingularMatrix(format!(
                            "non-positive pivot {pivot:e} at {i}"
                        )));
                    }
                    l.set(i, i, pivot.sqrt());
                } else {
                    l.set(i, j, (self.get(i, j) - dot) / l.get(j, j));
                }
            }
        }
        Ok(l)
    }

    /// Solves `self · x = b` for symmetric positive definite `self`.
    ///
    /// # Errors
    ///
    /// Returns an error if `b` has the wrong length or the factorization fails.
    pub fn cholesky_solve(&self, b: &[f64]) -> Result<Vector<f64>> {
        let n = self.rows;
        if b.len() != n {
            return Err(PretraceError::dimension_mismatch("right-hand side", n, b.len()));
        }
        let l = self.cholesky()?;

        // L y = b
        let mut y = vec![0.0; n];
        for i in 0..n {
            let dot: f64 = l.row(i)[..i].iter().zip(&y).map(|(a, b)| a * b).sum();
            y[i] = (b[i] - dot) / l.get(i, i);
        }

        // Lᵀ x = y
        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let dot: f64 = ((i + 1)..n).map(|k| l.get(k, i) * x[k]).sum();
            x[i] = (y[i] - dot) / l.get(i, i);
        }

        Ok(Vector::from_vec(x))
    }
}

#[cfg(test)]
#[path = "matrix_tests.rs"]
mod tests;
