//! Linear-algebra kernels: factorizations, inversion, and eigensolvers.

pub(crate) mod cholesky;
pub(crate) mod eigen;
pub(crate) mod lu;
pub(crate) mod qr;
pub(crate) mod svd;

use crate::{
    error::{Error, EvalResult},
    matrix::Matrix,
};

/// Rejects non-square input with the kernel's name in the message.
pub(crate) fn require_square(function: &'static str, m: &Matrix) -> EvalResult<()> {
    if m.is_square() {
        Ok(())
    } else {
        Err(Error::invalid_argument(
            function,
            format!("requires a square matrix, got {}", m.shape_string()),
        ))
    }
}

/// Euclidean norm of a slice.
pub(crate) fn norm(v: &[f64]) -> f64 {
    v.iter().map(|&x| x * x).sum::<f64>().sqrt()
}
