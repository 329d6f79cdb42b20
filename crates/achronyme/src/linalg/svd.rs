//! Singular value decomposition by one-sided Jacobi rotations.
//!
//! The working matrix's columns are orthogonalized pairwise; on convergence
//! the column norms are the singular values, the normalized columns form
//! `U`, and the accumulated rotations form `V`, giving
//! `A = U * diag(S) * V^T` with `S` descending.

use super::norm;
use crate::{
    error::{Error, EvalResult},
    matrix::Matrix,
};

const MAX_SWEEPS: usize = 60;
const ORTHOGONALITY_TOLERANCE: f64 = 1e-12;

pub(crate) struct SvdFactors {
    pub u: Matrix,
    /// Singular values, descending.
    pub s: Vec<f64>,
    pub v: Matrix,
}

pub(crate) fn svd(a: &Matrix) -> EvalResult<SvdFactors> {
    // One-sided Jacobi wants at least as many rows as columns; factor the
    // transpose otherwise and swap the roles of U and V.
    if a.rows() < a.cols() {
        let transposed = svd(&a.transpose())?;
        return Ok(SvdFactors {
            u: transposed.v,
            s: transposed.s,
            v: transposed.u,
        });
    }

    let m = a.rows();
    let n = a.cols();
    let mut w = a.clone();
    let mut v = Matrix::identity(n);

    let mut converged = false;
    for _ in 0..MAX_SWEEPS {
        let mut rotated = false;
        for p in 0..n {
            for q in (p + 1)..n {
                let mut alpha = 0.0;
                let mut beta = 0.0;
                let mut gamma = 0.0;
                for i in 0..m {
                    let wp = w.get(i, p);
                    let wq = w.get(i, q);
                    alpha += wp * wp;
                    beta += wq * wq;
                    gamma += wp * wq;
                }
                if gamma.abs() <= ORTHOGONALITY_TOLERANCE * (alpha * beta).sqrt() {
                    continue;
                }
                rotated = true;

                let zeta = (beta - alpha) / (2.0 * gamma);
                let t = zeta.signum() / (zeta.abs() + (1.0 + zeta * zeta).sqrt());
                let c = 1.0 / (1.0 + t * t).sqrt();
                let s = c * t;

                for i in 0..m {
                    let wp = w.get(i, p);
                    let wq = w.get(i, q);
                    w.set(i, p, c * wp - s * wq);
                    w.set(i, q, s * wp + c * wq);
                }
                for i in 0..n {
                    let vp = v.get(i, p);
                    let vq = v.get(i, q);
                    v.set(i, p, c * vp - s * vq);
                    v.set(i, q, s * vp + c * vq);
                }
            }
        }
        if !rotated {
            converged = true;
            break;
        }
    }
    if !converged {
        return Err(Error::NonConvergent { iterations: MAX_SWEEPS });
    }

    // Column norms are the singular values; normalized columns form U.
    let mut order: Vec<usize> = (0..n).collect();
    let sigmas: Vec<f64> = (0..n)
        .map(|j| {
            let column: Vec<f64> = (0..m).map(|i| w.get(i, j)).collect();
            norm(&column)
        })
        .collect();
    order.sort_by(|&x, &y| sigmas[y].total_cmp(&sigmas[x]));

    let mut u = Matrix::zeros(m, n);
    let mut s = Vec::with_capacity(n);
    let mut v_sorted = Matrix::zeros(n, n);
    for (dst, &src) in order.iter().enumerate() {
        let sigma = sigmas[src];
        s.push(sigma);
        if sigma > 0.0 {
            for i in 0..m {
                u.set(i, dst, w.get(i, src) / sigma);
            }
        }
        for i in 0..n {
            v_sorted.set(i, dst, v.get(i, src));
        }
    }

    Ok(SvdFactors { u, s, v: v_sorted })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconstruct(f: &SvdFactors) -> Matrix {
        let n = f.s.len();
        let mut sigma = Matrix::zeros(n, n);
        for (i, &value) in f.s.iter().enumerate() {
            sigma.set(i, i, value);
        }
        f.u.matmul(&sigma).unwrap().matmul(&f.v.transpose()).unwrap()
    }

    #[test]
    fn reconstructs_a_square_matrix() {
        let a = Matrix::new(3, 3, vec![3.0, 1.0, 1.0, -1.0, 3.0, 1.0, 1.0, 1.0, 3.0]).unwrap();
        let factors = svd(&a).unwrap();
        let reconstructed = reconstruct(&factors);
        for (x, y) in reconstructed.data().iter().zip(a.data()) {
            assert!((x - y).abs() < 1e-8, "{x} vs {y}");
        }
    }

    #[test]
    fn singular_values_descend() {
        let a = Matrix::new(3, 3, vec![2.0, 0.0, 0.0, 0.0, 5.0, 0.0, 0.0, 0.0, 1.0]).unwrap();
        let factors = svd(&a).unwrap();
        assert!((factors.s[0] - 5.0).abs() < 1e-9);
        assert!((factors.s[1] - 2.0).abs() < 1e-9);
        assert!((factors.s[2] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn wide_matrices_factor_through_the_transpose() {
        let a = Matrix::new(2, 3, vec![1.0, 0.0, 2.0, 0.0, 3.0, 0.0]).unwrap();
        let factors = svd(&a).unwrap();
        let reconstructed = reconstruct(&factors);
        assert_eq!((reconstructed.rows(), reconstructed.cols()), (2, 3));
        for (x, y) in reconstructed.data().iter().zip(a.data()) {
            assert!((x - y).abs() < 1e-8);
        }
    }
}
