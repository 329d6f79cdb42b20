//! QR factorization via Householder reflections.
//!
//! Produces orthogonal `Q` (m x m) and upper-triangular `R` (m x n) with
//! `A = Q * R`. Each reflector zeroes the subdiagonal of one column; `Q` is
//! accumulated by applying the reflectors to the identity from the right.

use super::norm;
use crate::matrix::Matrix;

pub(crate) struct QrFactors {
    pub q: Matrix,
    pub r: Matrix,
}

pub(crate) fn qr(a: &Matrix) -> QrFactors {
    let m = a.rows();
    let n = a.cols();
    let mut r = a.clone();
    let mut q = Matrix::identity(m);
    let mut v = vec![0.0; m];

    let steps = n.min(m.saturating_sub(1));
    for k in 0..steps {
        // Householder vector for column k below the diagonal.
        let column: Vec<f64> = (k..m).map(|i| r.get(i, k)).collect();
        let column_norm = norm(&column);
        if column_norm == 0.0 {
            continue;
        }
        // Sign choice avoids cancellation in the leading component.
        let alpha = if column[0] >= 0.0 { -column_norm } else { column_norm };

        let v_len = m - k;
        v[0] = column[0] - alpha;
        v[1..v_len].copy_from_slice(&column[1..]);
        let v_norm_sq: f64 = v[..v_len].iter().map(|&x| x * x).sum();
        if v_norm_sq == 0.0 {
            continue;
        }
        let beta = 2.0 / v_norm_sq;

        // R <- H R, touching rows k.. and columns k.. only.
        for j in k..n {
            let mut dot = 0.0;
            for i in 0..v_len {
                dot += v[i] * r.get(k + i, j);
            }
            let scale = beta * dot;
            for i in 0..v_len {
                r.set(k + i, j, r.get(k + i, j) - scale * v[i]);
            }
        }
        // Clean the column the reflector just zeroed.
        r.set(k, k, alpha);
        for i in (k + 1)..m {
            r.set(i, k, 0.0);
        }

        // Q <- Q H (right application accumulates H_0 H_1 ... H_{s-1}).
        for row in 0..m {
            let mut dot = 0.0;
            for i in 0..v_len {
                dot += q.get(row, k + i) * v[i];
            }
            let scale = beta * dot;
            for i in 0..v_len {
                q.set(row, k + i, q.get(row, k + i) - scale * v[i]);
            }
        }
    }

    QrFactors { q, r }
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
    fn qr_reconstructs_the_input() {
        let a = Matrix::new(3, 3, vec![12.0, -51.0, 4.0, 6.0, 167.0, -68.0, -4.0, 24.0, -41.0]).unwrap();
        let QrFactors { q, r } = qr(&a);
        assert_matrix_close(&q.matmul(&r).unwrap(), &a, 1e-9);
    }

    #[test]
    fn q_is_orthogonal() {
        let a = Matrix::new(3, 3, vec![2.0, 0.5, 1.0, -1.0, 3.0, 0.0, 4.0, 1.0, -2.0]).unwrap();
        let QrFactors { q, .. } = qr(&a);
        let qtq = q.transpose().matmul(&q).unwrap();
        assert_matrix_close(&qtq, &Matrix::identity(3), 1e-9);
    }

    #[test]
    fn r_is_upper_triangular() {
        let a = Matrix::new(3, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0]).unwrap();
        let QrFactors { r, .. } = qr(&a);
        for i in 1..3 {
            for j in 0..i {
                assert_eq!(r.get(i, j), 0.0);
            }
        }
    }

    #[test]
    fn tall_matrices_factor_too() {
        let a = Matrix::new(4, 2, vec![1.0, 0.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0]).unwrap();
        let QrFactors { q, r } = qr(&a);
        assert_eq!((q.rows(), q.cols()), (4, 4));
        assert_eq!((r.rows(), r.cols()), (4, 2));
        assert_matrix_close(&q.matmul(&r).unwrap(), &a, 1e-9);
    }
}
