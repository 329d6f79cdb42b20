//! Eigensolvers: power iteration, the shifted QR algorithm, and the
//! symmetric Jacobi eigensolver.

use super::{
    norm,
    qr::{qr, QrFactors},
    require_square,
};
use crate::{
    error::{Error, EvalResult},
    matrix::Matrix,
};

/// Dominant eigenvalue/eigenvector pair by power iteration.
///
/// Starts from the normalized all-ones vector and iterates `v <- A v / |A v|`
/// with the Rayleigh quotient as the eigenvalue estimate. Converges when
/// `|A v - lambda v| / |v| < tol`; exhausting `max_iter` raises
/// [`Error::NonConvergent`].
pub(crate) fn power_iteration(
    a: &Matrix,
    max_iter: usize,
    tol: f64,
) -> EvalResult<(f64, Vec<f64>)> {
    require_square("poweriteration", a)?;
    let n = a.rows();
    let mut v = vec![1.0 / (n as f64).sqrt(); n];

    for _ in 0..max_iter {
        let w = apply(a, &v);
        let lambda: f64 = v.iter().zip(&w).map(|(x, y)| x * y).sum();

        let residual: f64 = w
            .iter()
            .zip(&v)
            .map(|(wi, vi)| {
                let r = wi - lambda * vi;
                r * r
            })
            .sum::<f64>()
            .sqrt();
        if residual < tol {
            return Ok((lambda, v));
        }

        let w_norm = norm(&w);
        if w_norm == 0.0 {
            // The iterate landed in the null space; zero is the eigenvalue.
            return Ok((0.0, v));
        }
        v = w.into_iter().map(|x| x / w_norm).collect();
    }
    Err(Error::NonConvergent { iterations: max_iter })
}

fn apply(a: &Matrix, v: &[f64]) -> Vec<f64> {
    (0..a.rows())
        .map(|i| a.row(i).iter().zip(v).map(|(x, y)| x * y).sum())
        .collect()
}

/// All eigenvalues by the shifted QR algorithm with deflation.
///
/// Uses the Wilkinson shift from the trailing 2x2 block. Matrices with
/// complex eigenvalue pairs do not deflate and raise
/// [`Error::NonConvergent`] once the iteration budget is spent. Eigenvalues
/// are returned in descending order.
pub(crate) fn qr_eigenvalues(a: &Matrix, max_iter: usize, tol: f64) -> EvalResult<Vec<f64>> {
    require_square("qreigenvalues", a)?;
    let mut h = a.clone();
    let mut size = h.rows();
    let mut eigenvalues = Vec::with_capacity(size);
    let mut iterations = 0;

    while size > 1 {
        let off = h.get(size - 1, size - 2).abs();
        let scale = h.get(size - 1, size - 1).abs() + h.get(size - 2, size - 2).abs();
        if off <= tol * scale.max(1.0) {
            eigenvalues.push(h.get(size - 1, size - 1));
            size -= 1;
            continue;
        }

        if iterations >= max_iter {
            return Err(Error::NonConvergent { iterations });
        }
        iterations += 1;

        let mu = wilkinson_shift(&h, size);
        let mut active = submatrix(&h, size);
        for i in 0..size {
            active.set(i, i, active.get(i, i) - mu);
        }
        let QrFactors { q, r } = qr(&active);
        let mut next = r.matmul(&q).expect("factor shapes conform");
        for i in 0..size {
            next.set(i, i, next.get(i, i) + mu);
        }
        for i in 0..size {
            for j in 0..size {
                h.set(i, j, next.get(i, j));
            }
        }
    }
    eigenvalues.push(h.get(0, 0));
    eigenvalues.sort_by(|x, y| y.total_cmp(x));
    Ok(eigenvalues)
}

fn submatrix(h: &Matrix, size: usize) -> Matrix {
    let mut out = Matrix::zeros(size, size);
    for i in 0..size {
        for j in 0..size {
            out.set(i, j, h.get(i, j));
        }
    }
    out
}

/// Wilkinson shift: the eigenvalue of the trailing 2x2 block closest to its
/// bottom-right entry.
fn wilkinson_shift(h: &Matrix, size: usize) -> f64 {
    let a = h.get(size - 2, size - 2);
    let b = h.get(size - 2, size - 1);
    let c = h.get(size - 1, size - 2);
    let d = h.get(size - 1, size - 1);
    let delta = (a - d) / 2.0;
    let bc = b * c;
    let discriminant = delta * delta + bc;
    if discriminant < 0.0 {
        // Complex pair; fall back to the bottom-right entry.
        return d;
    }
    let sign = if delta >= 0.0 { 1.0 } else { -1.0 };
    let denominator = delta + sign * discriminant.sqrt();
    if denominator == 0.0 {
        return d;
    }
    d - bc / denominator
}

/// Full eigensystem of a symmetric matrix by cyclic Jacobi rotations.
///
/// Returns `(eigenvalues, eigenvectors)` with eigenvalues descending and
/// eigenvectors as the columns of the returned matrix. `max_iter` bounds the
/// number of sweeps; convergence is reached when every off-diagonal entry
/// falls below `tol`.
pub(crate) fn symmetric_eigen(
    a: &Matrix,
    max_iter: usize,
    tol: f64,
) -> EvalResult<(Vec<f64>, Matrix)> {
    require_square("eig", a)?;
    if !a.is_symmetric(super::cholesky::SYMMETRY_TOLERANCE) {
        return Err(Error::invalid_argument("eig", "requires a symmetric matrix"));
    }

    let n = a.rows();
    let mut d = a.clone();
    let mut v = Matrix::identity(n);

    let mut converged = false;
    for _ in 0..max_iter {
        let mut off_max = 0.0f64;
        for p in 0..n {
            for q in (p + 1)..n {
                off_max = off_max.max(d.get(p, q).abs());
            }
        }
        if off_max < tol {
            converged = true;
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = d.get(p, q);
                if apq.abs() < tol * 1e-3 {
                    continue;
                }
                let app = d.get(p, p);
                let aqq = d.get(q, q);
                let theta = (aqq - app) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (1.0 + theta * theta).sqrt());
                let c = 1.0 / (1.0 + t * t).sqrt();
                let s = c * t;

                // Rotate rows and columns p, q of the working matrix.
                for k in 0..n {
                    let dkp = d.get(k, p);
                    let dkq = d.get(k, q);
                    d.set(k, p, c * dkp - s * dkq);
                    d.set(k, q, s * dkp + c * dkq);
                }
                for k in 0..n {
                    let dpk = d.get(p, k);
                    let dqk = d.get(q, k);
                    d.set(p, k, c * dpk - s * dqk);
                    d.set(q, k, s * dpk + c * dqk);
                }
                for k in 0..n {
                    let vkp = v.get(k, p);
                    let vkq = v.get(k, q);
                    v.set(k, p, c * vkp - s * vkq);
                    v.set(k, q, s * vkp + c * vkq);
                }
            }
        }
    }
    if !converged {
        return Err(Error::NonConvergent { iterations: max_iter });
    }

    // Sort descending, carrying eigenvector columns along.
    let mut order: Vec<usize> = (0..n).collect();
    let diag: Vec<f64> = (0..n).map(|i| d.get(i, i)).collect();
    order.sort_by(|&x, &y| diag[y].total_cmp(&diag[x]));

    let eigenvalues: Vec<f64> = order.iter().map(|&i| diag[i]).collect();
    let mut vectors = Matrix::zeros(n, n);
    for (dst, &src) in order.iter().enumerate() {
        for i in 0..n {
            vectors.set(i, dst, v.get(i, src));
        }
    }
    Ok((eigenvalues, vectors))
}
