//! Element-wise arithmetic, broadcasting, and comparison kernels.
//!
//! Broadcasting rules: scalar op vector/matrix applies element-wise; vector
//! op vector requires equal length (Hadamard); matrix `+`/`-` requires an
//! identical shape while `*` is the conforming matrix product. Numbers
//! promote to complex when the other operand is complex. Division by zero is
//! not intercepted; results follow IEEE-754.

use num_complex::Complex64;

use crate::{
    error::{Error, EvalResult},
    expressions::BinOp,
    value::Value,
};

/// Dispatches a binary operator over two evaluated operands.
pub(crate) fn binary(op: BinOp, lhs: Value, rhs: Value) -> EvalResult<Value> {
    if op.is_comparison() {
        return compare(op, &lhs, &rhs);
    }
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(scalar(op, a, b))),

        // Complex promotion.
        (Value::Complex(a), Value::Complex(b)) => complex(op, a, b).map(Value::Complex),
        (Value::Number(a), Value::Complex(b)) => complex(op, a.into(), b).map(Value::Complex),
        (Value::Complex(a), Value::Number(b)) => complex(op, a, b.into()).map(Value::Complex),

        // Scalar broadcast over vectors.
        (Value::Number(a), Value::Vector(v)) => {
            Ok(Value::Vector(v.into_iter().map(|x| scalar(op, a, x)).collect()))
        }
        (Value::Vector(v), Value::Number(b)) => {
            Ok(Value::Vector(v.into_iter().map(|x| scalar(op, x, b)).collect()))
        }

        // Hadamard on equal-length vectors.
        (Value::Vector(a), Value::Vector(b)) => {
            if a.len() != b.len() {
                return Err(shape_error(op, a.len(), b.len()));
            }
            Ok(Value::Vector(
                a.into_iter().zip(b).map(|(x, y)| scalar(op, x, y)).collect(),
            ))
        }

        // Scalar broadcast over matrices.
        (Value::Number(a), Value::Matrix(m)) => Ok(Value::Matrix(m.map(|x| scalar(op, a, x)))),
        (Value::Matrix(m), Value::Number(b)) => Ok(Value::Matrix(m.map(|x| scalar(op, x, b)))),

        (Value::Matrix(a), Value::Matrix(b)) => match op {
            BinOp::Add => a.zip_with(&b, "matrix addition", |x, y| x + y).map(Value::Matrix),
            BinOp::Sub => a
                .zip_with(&b, "matrix subtraction", |x, y| x - y)
                .map(Value::Matrix),
            BinOp::Mul => a.matmul(&b).map(Value::Matrix),
            _ => Err(Error::type_error(
                format!("matrix {op} matrix"),
                "`+`, `-` or `*`",
                "unsupported operator",
            )),
        },

        // Complex vectors broadcast like real ones for + - * /.
        (Value::ComplexVector(v), rhs) => complex_vector_op(op, v, rhs, false),
        (lhs, Value::ComplexVector(v)) => complex_vector_op(op, v, lhs, true),

        (lhs, rhs) => Err(Error::type_error(
            format!("{} {op} {}", lhs.type_name(), rhs.type_name()),
            "compatible numeric operands",
            "incompatible operand pair",
        )),
    }
}

/// Negation per type.
pub(crate) fn negate(value: Value) -> EvalResult<Value> {
    match value {
        Value::Number(n) => Ok(Value::Number(-n)),
        Value::Complex(z) => Ok(Value::Complex(-z)),
        Value::Vector(v) => Ok(Value::Vector(v.into_iter().map(|x| -x).collect())),
        Value::ComplexVector(v) => Ok(Value::ComplexVector(v.into_iter().map(|z| -z).collect())),
        Value::Matrix(m) => Ok(Value::Matrix(m.map(|x| -x))),
        other => Err(Error::type_error("negation", "a numeric value", other.type_name())),
    }
}

fn scalar(op: BinOp, a: f64, b: f64) -> f64 {
    match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div => a / b,
        BinOp::Rem => a % b,
        BinOp::Pow => a.powf(b),
        _ => unreachable!("comparisons are handled before numeric dispatch"),
    }
}

fn complex(op: BinOp, a: Complex64, b: Complex64) -> EvalResult<Complex64> {
    match op {
        BinOp::Add => Ok(a + b),
        BinOp::Sub => Ok(a - b),
        BinOp::Mul => Ok(a * b),
        BinOp::Div => Ok(a / b),
        BinOp::Pow => Ok(a.powc(b)),
        BinOp::Rem => Err(Error::type_error("complex %", "real operands", "complex")),
        _ => unreachable!("comparisons are handled before numeric dispatch"),
    }
}

/// `+ - * /` between a complex vector and a scalar, real vector, or complex
/// vector. `swapped` is true when the complex vector was the right operand.
fn complex_vector_op(op: BinOp, v: Vec<Complex64>, other: Value, swapped: bool) -> EvalResult<Value> {
    let apply = |x: Complex64, y: Complex64| -> EvalResult<Complex64> {
        if swapped { complex(op, y, x) } else { complex(op, x, y) }
    };
    let out = match other {
        Value::Number(n) => {
            let n = Complex64::from(n);
            v.into_iter().map(|z| apply(z, n)).collect::<EvalResult<Vec<_>>>()?
        }
        Value::Complex(c) => v.into_iter().map(|z| apply(z, c)).collect::<EvalResult<Vec<_>>>()?,
        Value::Vector(real) => {
            if v.len() != real.len() {
                return Err(shape_error(op, v.len(), real.len()));
            }
            v.into_iter()
                .zip(real)
                .map(|(z, x)| apply(z, x.into()))
                .collect::<EvalResult<Vec<_>>>()?
        }
        Value::ComplexVector(w) => {
            if v.len() != w.len() {
                return Err(shape_error(op, v.len(), w.len()));
            }
            v.into_iter()
                .zip(w)
                .map(|(z, x)| apply(z, x))
                .collect::<EvalResult<Vec<_>>>()?
        }
        other => {
            return Err(Error::type_error(
                format!("complex vector {op} {}", other.type_name()),
                "a scalar or equal-length vector",
                other.type_name(),
            ));
        }
    };
    Ok(Value::ComplexVector(out))
}

fn shape_error(op: BinOp, lhs: usize, rhs: usize) -> Error {
    Error::Shape {
        operation: match op {
            BinOp::Add => "vector addition",
            BinOp::Sub => "vector subtraction",
            BinOp::Mul => "element-wise multiplication",
            BinOp::Div => "element-wise division",
            BinOp::Rem => "element-wise remainder",
            BinOp::Pow => "element-wise power",
            _ => "vector comparison",
        },
        lhs: format!("{lhs}-vector"),
        rhs: format!("{rhs}-vector"),
    }
}

/// Comparison operators yield `Number(1.0)` for true and `Number(0.0)` for
/// false. Ordering is defined on real numbers only; equality extends to
/// complex operands.
fn compare(op: BinOp, lhs: &Value, rhs: &Value) -> EvalResult<Value> {
    let truth = |b: bool| Ok(Value::Number(if b { 1.0 } else { 0.0 }));
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => match op {
            BinOp::Lt => truth(a < b),
            BinOp::Le => truth(a <= b),
            BinOp::Gt => truth(a > b),
            BinOp::Ge => truth(a >= b),
            BinOp::Eq => truth(a == b),
            BinOp::Ne => truth(a != b),
            _ => unreachable!("caller checked is_comparison"),
        },
        (Value::Complex(_) | Value::Number(_), Value::Complex(_) | Value::Number(_))
            if matches!(op, BinOp::Eq | BinOp::Ne) =>
        {
            let a = promote(lhs);
            let b = promote(rhs);
            match op {
                BinOp::Eq => truth(a == b),
                BinOp::Ne => truth(a != b),
                _ => unreachable!(),
            }
        }
        _ => Err(Error::type_error(
            format!("{} {op} {}", lhs.type_name(), rhs.type_name()),
            "real operands",
            "non-numeric operand",
        )),
    }
}

fn promote(value: &Value) -> Complex64 {
    match value {
        Value::Number(n) => Complex64::from(*n),
        Value::Complex(z) => *z,
        _ => unreachable!("caller matched numeric operands"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_broadcast_over_vector() {
        let out = binary(BinOp::Add, Value::Number(1.0), Value::Vector(vec![1.0, 2.0])).unwrap();
        assert_eq!(out, Value::Vector(vec![2.0, 3.0]));

        // Operand order matters for non-commutative operators.
        let out = binary(BinOp::Sub, Value::Number(10.0), Value::Vector(vec![1.0, 2.0])).unwrap();
        assert_eq!(out, Value::Vector(vec![9.0, 8.0]));
        let out = binary(BinOp::Sub, Value::Vector(vec![1.0, 2.0]), Value::Number(10.0)).unwrap();
        assert_eq!(out, Value::Vector(vec![-9.0, -8.0]));
    }

    #[test]
    fn hadamard_requires_equal_length() {
        let err = binary(
            BinOp::Mul,
            Value::Vector(vec![1.0, 2.0]),
            Value::Vector(vec![1.0, 2.0, 3.0]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Shape { .. }));
    }

    #[test]
    fn number_promotes_to_complex() {
        let out = binary(
            BinOp::Mul,
            Value::Number(2.0),
            Value::Complex(Complex64::new(1.0, 1.0)),
        )
        .unwrap();
        assert_eq!(out, Value::Complex(Complex64::new(2.0, 2.0)));
    }

    #[test]
    fn comparisons_yield_zero_or_one() {
        assert_eq!(
            binary(BinOp::Lt, Value::Number(1.0), Value::Number(2.0)).unwrap(),
            Value::Number(1.0)
        );
        assert_eq!(
            binary(BinOp::Ge, Value::Number(1.0), Value::Number(2.0)).unwrap(),
            Value::Number(0.0)
        );
    }

    #[test]
    fn division_by_zero_follows_ieee() {
        let out = binary(BinOp::Div, Value::Number(1.0), Value::Number(0.0)).unwrap();
        assert_eq!(out, Value::Number(f64::INFINITY));
    }

    #[test]
    fn matrix_power_is_rejected() {
        let m = crate::matrix::Matrix::identity(2);
        let err = binary(BinOp::Pow, Value::Matrix(m.clone()), Value::Matrix(m)).unwrap_err();
        assert!(matches!(err, Error::Type { .. }));
    }
}
