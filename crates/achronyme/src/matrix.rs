//! Dense row-major matrix storage shared by the evaluator and kernels.
//!
//! Invariant: `data.len() == rows * cols` and both dimensions are nonzero.
//! A matrix with zero rows or columns is never constructed.

use crate::error::{Error, EvalResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Builds a matrix, validating the dimension invariant.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> EvalResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::invalid_argument(
                "matrix",
                format!("dimensions must be nonzero, got {rows}x{cols}"),
            ));
        }
        if data.len() != rows * cols {
            return Err(Error::invalid_argument(
                "matrix",
                format!("{rows}x{cols} matrix requires {} elements, got {}", rows * cols, data.len()),
            ));
        }
        Ok(Self { rows, cols, data })
    }

    /// All-zero matrix.
    ///
    /// # Panics
    /// Panics when either dimension is zero; kernel callers validate first.
    pub(crate) fn zeros(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "matrix dimensions must be nonzero");
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.set(i, i, 1.0);
        }
        m
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    #[inline]
    pub(crate) fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    pub(crate) fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// `"RxC"` rendering used in shape errors.
    pub(crate) fn shape_string(&self) -> String {
        format!("{}x{}", self.rows, self.cols)
    }

    pub fn transpose(&self) -> Self {
        let mut out = Self::zeros(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.set(c, r, self.get(r, c));
            }
        }
        out
    }

    pub(crate) fn trace(&self) -> f64 {
        (0..self.rows.min(self.cols)).map(|i| self.get(i, i)).sum()
    }

    /// Conforming matrix product: `(m x n) * (n x p) = (m x p)`.
    pub fn matmul(&self, other: &Self) -> EvalResult<Self> {
        if self.cols != other.rows {
            return Err(Error::Shape {
                operation: "matrix multiplication",
                lhs: self.shape_string(),
                rhs: other.shape_string(),
            });
        }
        let mut out = Self::zeros(self.rows, other.cols);
        for r in 0..self.rows {
            for k in 0..self.cols {
                let lhs = self.get(r, k);
                if lhs == 0.0 {
                    continue;
                }
                for c in 0..other.cols {
                    out.data[r * other.cols + c] += lhs * other.get(k, c);
                }
            }
        }
        Ok(out)
    }

    /// Applies `f` to every element, allocating a new matrix.
    pub(crate) fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| f(x)).collect(),
        }
    }

    /// Element-wise combination of two identically-shaped matrices.
    pub(crate) fn zip_with(
        &self,
        other: &Self,
        operation: &'static str,
        f: impl Fn(f64, f64) -> f64,
    ) -> EvalResult<Self> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(Error::Shape {
                operation,
                lhs: self.shape_string(),
                rhs: other.shape_string(),
            });
        }
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }

    /// Symmetry check with an absolute tolerance per element pair.
    pub(crate) fn is_symmetric(&self, tolerance: f64) -> bool {
        if !self.is_square() {
            return false;
        }
        for r in 0..self.rows {
            for c in (r + 1)..self.cols {
                if (self.get(r, c) - self.get(c, r)).abs() > tolerance {
                    return false;
                }
            }
        }
        true
    }
}
