//! Cholesky factorization of symmetric positive-definite matrices.

use crate::{
    error::{Error, EvalResult},
    matrix::Matrix,
};

/// Tolerance for the symmetry precondition.
pub(crate) const SYMMETRY_TOLERANCE: f64 = 1e-10;

/// Factors `A = L * L^T` with `L` lower-triangular.
///
/// Rejects non-square, asymmetric, and non-positive-definite input with
/// [`Error::NotSpd`].
pub(crate) fn cholesky(a: &Matrix) -> EvalResult<Matrix> {
    if !a.is_symmetric(SYMMETRY_TOLERANCE) {
        return Err(Error::NotSpd);
    }
    let n = a.rows();
    let mut l = Matrix::zeros(n, n);

    for j in 0..n {
        let mut diag = a.get(j, j);
        for k in 0..j {
            diag -= l.get(j, k) * l.get(j, k);
        }
        // A vanishing or negative pivot means the matrix is not positive
        // definite.
        if diag <= 0.0 {
            return Err(Error::NotSpd);
        }
        let pivot = diag.sqrt();
        l.set(j, j, pivot);

        for i in (j + 1)..n {
            let mut sum = a.get(i, j);
            for k in 0..j {
                sum -= l.get(i, k) * l.get(j, k);
            }
            l.set(i, j, sum / pivot);
        }
    }
    Ok(l)
}
