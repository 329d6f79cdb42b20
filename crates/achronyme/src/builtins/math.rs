//! Scalar math builtins, vectorized element-wise over vectors and matrices.

use num_complex::Complex64;

use super::{number_arg, Builtin};
use crate::{
    error::{Error, EvalResult},
    value::Value,
};

/// Applies a unary scalar function to a number, or element-wise to a vector,
/// matrix, or complex operand.
pub(crate) fn unary(builtin: Builtin, value: Value) -> EvalResult<Value> {
    match value {
        Value::Number(x) => Ok(Value::Number(real_fn(builtin)(x))),
        Value::Vector(v) => {
            let f = real_fn(builtin);
            Ok(Value::Vector(v.into_iter().map(f).collect()))
        }
        Value::Matrix(m) => Ok(Value::Matrix(m.map(real_fn(builtin)))),
        Value::Complex(z) => complex_unary(builtin, z),
        Value::ComplexVector(v) => {
            if builtin == Builtin::Abs {
                return Ok(Value::Vector(v.iter().map(|z| z.norm()).collect()));
            }
            let out: EvalResult<Vec<Complex64>> = v
                .into_iter()
                .map(|z| match complex_unary(builtin, z)? {
                    Value::Complex(w) => Ok(w),
                    Value::Number(x) => Ok(Complex64::from(x)),
                    other => Err(Error::type_error(builtin.to_string(), "complex", other.type_name())),
                })
                .collect();
            Ok(Value::ComplexVector(out?))
        }
        other => Err(Error::type_error(
            builtin.to_string(),
            "number, vector or matrix",
            other.type_name(),
        )),
    }
}

fn real_fn(builtin: Builtin) -> fn(f64) -> f64 {
    match builtin {
        Builtin::Sin => f64::sin,
        Builtin::Cos => f64::cos,
        Builtin::Tan => f64::tan,
        Builtin::Asin => f64::asin,
        Builtin::Acos => f64::acos,
        Builtin::Atan => f64::atan,
        Builtin::Sinh => f64::sinh,
        Builtin::Cosh => f64::cosh,
        Builtin::Tanh => f64::tanh,
        Builtin::Exp => f64::exp,
        Builtin::Ln => f64::ln,
        Builtin::Log10 => f64::log10,
        Builtin::Log2 => f64::log2,
        Builtin::Sqrt => f64::sqrt,
        Builtin::Cbrt => f64::cbrt,
        Builtin::Floor => f64::floor,
        Builtin::Ceil => f64::ceil,
        Builtin::Round => f64::round,
        Builtin::Trunc => f64::trunc,
        Builtin::Sign => sign,
        Builtin::Abs => f64::abs,
        other => unreachable!("{other} is not a unary scalar builtin"),
    }
}

/// `sign(0) = 0`, unlike `f64::signum`.
fn sign(x: f64) -> f64 {
    if x == 0.0 { 0.0 } else { x.signum() }
}

fn complex_unary(builtin: Builtin, z: Complex64) -> EvalResult<Value> {
    let out = match builtin {
        Builtin::Abs => return Ok(Value::Number(z.norm())),
        Builtin::Sin => z.sin(),
        Builtin::Cos => z.cos(),
        Builtin::Tan => z.tan(),
        Builtin::Asin => z.asin(),
        Builtin::Acos => z.acos(),
        Builtin::Atan => z.atan(),
        Builtin::Sinh => z.sinh(),
        Builtin::Cosh => z.cosh(),
        Builtin::Tanh => z.tanh(),
        Builtin::Exp => z.exp(),
        Builtin::Ln => z.ln(),
        Builtin::Log10 => z.log10(),
        Builtin::Log2 => z.log2(),
        Builtin::Sqrt => z.sqrt(),
        Builtin::Cbrt => z.cbrt(),
        other => {
            return Err(Error::type_error(other.to_string(), "real operand", "complex"));
        }
    };
    Ok(Value::Complex(out))
}

/// `atan2(y, x)` on real numbers.
pub(crate) fn atan2(y: &Value, x: &Value) -> EvalResult<Value> {
    let y = number_arg("atan2", y)?;
    let x = number_arg("atan2", x)?;
    Ok(Value::Number(y.atan2(x)))
}

/// `pow(base, exponent)` with complex promotion.
pub(crate) fn pow(base: &Value, exponent: &Value) -> EvalResult<Value> {
    match (base, exponent) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a.powf(*b))),
        (Value::Number(a), Value::Complex(b)) => Ok(Value::Complex(Complex64::from(*a).powc(*b))),
        (Value::Complex(a), Value::Number(b)) => Ok(Value::Complex(a.powc(Complex64::from(*b)))),
        (Value::Complex(a), Value::Complex(b)) => Ok(Value::Complex(a.powc(*b))),
        (a, b) => Err(Error::type_error(
            "pow",
            "numeric operands",
            if a.as_number().is_none() { a.type_name() } else { b.type_name() },
        )),
    }
}

/// `log(x)` is the natural logarithm; `log(x, base)` rebases it.
pub(crate) fn log(args: &[Value]) -> EvalResult<Value> {
    match args {
        [x] => unary(Builtin::Ln, x.clone()),
        [x, base] => {
            let x = number_arg("log", x)?;
            let base = number_arg("log", base)?;
            Ok(Value::Number(x.ln() / base.ln()))
        }
        _ => Err(Error::invalid_argument(
            "log",
            format!("expects 1 or 2 arguments, received {}", args.len()),
        )),
    }
}
