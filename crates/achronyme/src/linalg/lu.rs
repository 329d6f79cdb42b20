//! LU factorization with partial pivoting, plus the solvers built on it.
//!
//! Produces `P * A = L * U` with `L` unit-lower-triangular, `U`
//! upper-triangular, and `P` the row-permutation matrix. A pivot column
//! whose remaining entries are all zero means the matrix is singular.

use super::require_square;
use crate::{
    error::{Error, EvalResult},
    matrix::Matrix,
};

#[derive(Debug)]
pub(crate) struct LuFactors {
    pub l: Matrix,
    pub u: Matrix,
    /// `perm[i]` is the source row of `A` that ended up in position `i`.
    pub perm: Vec<usize>,
    /// Whether the permutation is odd; flips the determinant's sign.
    pub odd_swaps: bool,
}

impl LuFactors {
    /// The permutation as an explicit matrix, `P[i][perm[i]] = 1`.
    pub fn permutation_matrix(&self) -> Matrix {
        let n = self.perm.len();
        let mut p = Matrix::zeros(n, n);
        for (i, &j) in self.perm.iter().enumerate() {
            p.set(i, j, 1.0);
        }
        p
    }
}

pub(crate) fn lu(a: &Matrix) -> EvalResult<LuFactors> {
    require_square("lu", a)?;
    let n = a.rows();
    let mut u = a.clone();
    let mut l = Matrix::identity(n);
    let mut perm: Vec<usize> = (0..n).collect();
    let mut odd_swaps = false;

    for k in 0..n {
        // Pivot selection: the largest remaining magnitude in column k.
        let pivot_row = (k..n)
            .max_by(|&i, &j| u.get(i, k).abs().total_cmp(&u.get(j, k).abs()))
            .expect("pivot range is non-empty");
        if u.get(pivot_row, k) == 0.0 {
            return Err(Error::Singular);
        }
        if pivot_row != k {
            swap_rows(&mut u, k, pivot_row, 0, n);
            // Only the already-computed multiplier columns move with the row.
            swap_rows(&mut l, k, pivot_row, 0, k);
            perm.swap(k, pivot_row);
            odd_swaps = !odd_swaps;
        }

        let pivot = u.get(k, k);
        for i in (k + 1)..n {
            let factor = u.get(i, k) / pivot;
            l.set(i, k, factor);
            u.set(i, k, 0.0);
            for j in (k + 1)..n {
                u.set(i, j, u.get(i, j) - factor * u.get(k, j));
            }
        }
    }

    Ok(LuFactors { l, u, perm, odd_swaps })
}

fn swap_rows(m: &mut Matrix, a: usize, b: usize, from_col: usize, to_col: usize) {
    for c in from_col..to_col {
        let tmp = m.get(a, c);
        m.set(a, c, m.get(b, c));
        m.set(b, c, tmp);
    }
}

/// Determinant.
///
/// Sizes up to 3 use the closed form, which is exact for integral entries;
/// larger matrices go through the LU diagonal. A singular factorization
/// means a zero determinant, not an error.
pub(crate) fn det(a: &Matrix) -> EvalResult<f64> {
    require_square("det", a)?;
    match a.rows() {
        1 => Ok(a.get(0, 0)),
        2 => Ok(a.get(0, 0) * a.get(1, 1) - a.get(0, 1) * a.get(1, 0)),
        3 => Ok(a.get(0, 0) * (a.get(1, 1) * a.get(2, 2) - a.get(1, 2) * a.get(2, 1))
            - a.get(0, 1) * (a.get(1, 0) * a.get(2, 2) - a.get(1, 2) * a.get(2, 0))
            + a.get(0, 2) * (a.get(1, 0) * a.get(2, 1) - a.get(1, 1) * a.get(2, 0))),
        n => match lu(a) {
            Ok(factors) => {
                let mut product = if factors.odd_swaps { -1.0 } else { 1.0 };
                for i in 0..n {
                    product *= factors.u.get(i, i);
                }
                Ok(product)
            }
            Err(Error::Singular) => Ok(0.0),
            Err(other) => Err(other),
        },
    }
}

/// Inverse via LU: solves `A * X = I` column by column.
pub(crate) fn inverse(a: &Matrix) -> EvalResult<Matrix> {
    require_square("inverse", a)?;
    let n = a.rows();
    let factors = lu(a)?;
    let mut out = Matrix::zeros(n, n);

    let mut y = vec![0.0; n];
    for col in 0..n {
        // Forward substitution on L with the permuted unit column.
        for i in 0..n {
            let b = if factors.perm[i] == col { 1.0 } else { 0.0 };
            let mut sum = b;
            for j in 0..i {
                sum -= factors.l.get(i, j) * y[j];
            }
            y[i] = sum;
        }
        // Back substitution on U.
        for i in (0..n).rev() {
            let mut sum = y[i];
            for j in (i + 1)..n {
                sum -= factors.u.get(i, j) * out.get(j, col);
            }
            out.set(i, col, sum / factors.u.get(i, i));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_matrix_close(a: &Matrix, b: &Matrix, tolerance: f64) {
        assert_eq!((a.rows(), a.cols()), (b.rows(), b.cols()));
        for (x, y) in a.data().iter().zip(b.data()) {
            assert!((x - y).abs() <= tolerance, "{x} vs {y}");
        }
    }

    #[test]
    fn pa_equals_lu() {
        let a = Matrix::new(3, 3, vec![2.0, 1.0, 1.0, 4.0, -6.0, 0.0, -2.0, 7.0, 2.0]).unwrap();
        let factors = lu(&a).unwrap();
        let pa = factors.permutation_matrix().matmul(&a).unwrap();
        let lu_product = factors.l.matmul(&factors.u).unwrap();
        assert_matrix_close(&pa, &lu_product, 1e-9);
    }

    #[test]
    fn l_is_unit_lower_and_u_is_upper() {
        let a = Matrix::new(3, 3, vec![1.0, 2.0, 4.0, 3.0, 8.0, 14.0, 2.0, 6.0, 13.0]).unwrap();
        let factors = lu(&a).unwrap();
        for i in 0..3 {
            assert_eq!(factors.l.get(i, i), 1.0);
            for j in (i + 1)..3 {
                assert_eq!(factors.l.get(i, j), 0.0);
            }
            for j in 0..i {
                assert_eq!(factors.u.get(i, j), 0.0);
            }
        }
    }

    #[test]
    fn singular_matrix_is_rejected() {
        let a = Matrix::new(2, 2, vec![1.0, 2.0, 2.0, 4.0]).unwrap();
        assert_eq!(lu(&a).unwrap_err(), Error::Singular);
    }

    #[test]
    fn determinant_small_sizes_are_exact() {
        let a = Matrix::new(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(det(&a).unwrap(), -2.0);

        let b = Matrix::new(3, 3, vec![6.0, 1.0, 1.0, 4.0, -2.0, 5.0, 2.0, 8.0, 7.0]).unwrap();
        assert_eq!(det(&b).unwrap(), -306.0);
    }

    #[test]
    fn determinant_of_singular_matrix_is_zero() {
        let a = Matrix::new(4, 4, vec![
            1.0, 2.0, 3.0, 4.0,
            2.0, 4.0, 6.0, 8.0,
            1.0, 0.0, 1.0, 0.0,
            0.0, 1.0, 0.0, 1.0,
        ])
        .unwrap();
        assert_eq!(det(&a).unwrap(), 0.0);
    }

    #[test]
    fn inverse_times_original_is_identity() {
        let a = Matrix::new(3, 3, vec![4.0, 7.0, 2.0, 3.0, 5.0, 1.0, 8.0, 2.0, 6.0]).unwrap();
        let product = a.matmul(&inverse(&a).unwrap()).unwrap();
        assert_matrix_close(&product, &Matrix::identity(3), 1e-9);
    }

    #[test]
    fn inverse_of_singular_matrix_fails() {
        let a = Matrix::new(2, 2, vec![1.0, 2.0, 2.0, 4.0]).unwrap();
        assert_eq!(inverse(&a).unwrap_err(), Error::Singular);
    }
}
