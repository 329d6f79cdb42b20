//! Matrix builtins: basic operations, decompositions, and eigensolvers.

use super::{index_arg, matrix_arg, number_arg, Builtin};
use crate::{
    error::{Error, EvalResult},
    linalg::{cholesky, eigen, lu, qr, svd},
    matrix::Matrix,
    value::Value,
};

pub(crate) fn unary(builtin: Builtin, value: &Value) -> EvalResult<Value> {
    // `identity` takes a size, not a matrix.
    if builtin == Builtin::Identity {
        let n = index_arg("identity", value)?;
        if n == 0 {
            return Err(Error::invalid_argument("identity", "size must be at least 1"));
        }
        return Ok(Value::Matrix(Matrix::identity(n)));
    }

    let truth = |b: bool| Value::Number(if b { 1.0 } else { 0.0 });
    match builtin {
        Builtin::Transpose => Ok(Value::Matrix(matrix_arg("transpose", value)?.transpose())),
        Builtin::Det => Ok(Value::Number(lu::det(matrix_arg("det", value)?)?)),
        Builtin::Inverse => Ok(Value::Matrix(lu::inverse(matrix_arg("inverse", value)?)?)),
        Builtin::Trace => Ok(Value::Number(matrix_arg("trace", value)?.trace())),
        Builtin::IsSymmetric => Ok(truth(
            matrix_arg("issymmetric", value)?.is_symmetric(cholesky::SYMMETRY_TOLERANCE),
        )),
        Builtin::IsPositiveDefinite => {
            let m = matrix_arg("ispositivedefinite", value)?;
            Ok(truth(cholesky::cholesky(m).is_ok()))
        }
        Builtin::Lu => {
            let factors = lu::lu(matrix_arg("lu", value)?)?;
            let p = factors.permutation_matrix();
            Ok(Value::Record(vec![
                ("L", Value::Matrix(factors.l)),
                ("U", Value::Matrix(factors.u)),
                ("P", Value::Matrix(p)),
            ]))
        }
        Builtin::Qr => {
            let factors = qr::qr(matrix_arg("qr", value)?);
            Ok(Value::Record(vec![
                ("Q", Value::Matrix(factors.q)),
                ("R", Value::Matrix(factors.r)),
            ]))
        }
        Builtin::Cholesky => Ok(Value::Matrix(cholesky::cholesky(matrix_arg("cholesky", value)?)?)),
        Builtin::Svd => {
            let factors = svd::svd(matrix_arg("svd", value)?)?;
            Ok(Value::Record(vec![
                ("U", Value::Matrix(factors.u)),
                ("S", Value::Vector(factors.s)),
                ("V", Value::Matrix(factors.v)),
            ]))
        }
        other => unreachable!("{other} is not a matrix builtin"),
    }
}

/// `powerIteration`, `qrEigenvalues`, and `eig` share the
/// `(matrix, maxIter, tol)` signature.
pub(crate) fn eigen(builtin: Builtin, m: &Value, max_iter: &Value, tol: &Value) -> EvalResult<Value> {
    let name = match builtin {
        Builtin::PowerIteration => "poweriteration",
        Builtin::QrEigenvalues => "qreigenvalues",
        Builtin::Eig => "eig",
        other => unreachable!("{other} is not an eigensolver"),
    };
    let m = matrix_arg(name, m)?;
    let max_iter = index_arg(name, max_iter)?;
    let tol = number_arg(name, tol)?;
    if tol <= 0.0 {
        return Err(Error::invalid_argument(name, format!("tolerance must be positive, got {tol}")));
    }

    match builtin {
        Builtin::PowerIteration => {
            let (eigenvalue, eigenvector) = eigen::power_iteration(m, max_iter, tol)?;
            Ok(Value::Record(vec![
                ("eigenvalue", Value::Number(eigenvalue)),
                ("eigenvector", Value::Vector(eigenvector)),
            ]))
        }
        Builtin::QrEigenvalues => Ok(Value::Vector(eigen::qr_eigenvalues(m, max_iter, tol)?)),
        Builtin::Eig => {
            let (values, vectors) = eigen::symmetric_eigen(m, max_iter, tol)?;
            Ok(Value::Record(vec![
                ("eigenvalues", Value::Vector(values)),
                ("eigenvectors", Value::Matrix(vectors)),
            ]))
        }
        _ => unreachable!(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: usize, cols: usize, data: &[f64]) -> Value {
        Value::Matrix(Matrix::new(rows, cols, data.to_vec()).unwrap())
    }

    #[test]
    fn det_of_small_matrix_is_exact() {
        let out = unary(Builtin::Det, &matrix(2, 2, &[1.0, 2.0, 3.0, 4.0])).unwrap();
        assert_eq!(out, Value::Number(-2.0));
    }

    #[test]
    fn identity_takes_a_size() {
        let out = unary(Builtin::Identity, &Value::Number(2.0)).unwrap();
        assert_eq!(out, matrix(2, 2, &[1.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn lu_returns_a_three_field_record() {
        let out = unary(Builtin::Lu, &matrix(2, 2, &[4.0, 3.0, 6.0, 3.0])).unwrap();
        let Value::Record(fields) = out else { panic!("expected record") };
        assert_eq!(
            fields.iter().map(|(name, _)| *name).collect::<Vec<_>>(),
            vec!["L", "U", "P"]
        );
    }

    #[test]
    fn positive_definite_probe() {
        let spd = matrix(2, 2, &[4.0, 1.0, 1.0, 3.0]);
        let indefinite = matrix(2, 2, &[1.0, 2.0, 2.0, 1.0]);
        assert_eq!(unary(Builtin::IsPositiveDefinite, &spd).unwrap(), Value::Number(1.0));
        assert_eq!(
            unary(Builtin::IsPositiveDefinite, &indefinite).unwrap(),
            Value::Number(0.0)
        );
    }
}
