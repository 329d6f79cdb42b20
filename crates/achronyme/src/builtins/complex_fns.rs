//! Complex construction and accessors.

use num_complex::Complex64;

use super::{number_arg, Builtin};
use crate::{
    error::{Error, EvalResult},
    value::Value,
};

/// `complex(re, im)`.
pub(crate) fn make_complex(re: &Value, im: &Value) -> EvalResult<Value> {
    let re = number_arg("complex", re)?;
    let im = number_arg("complex", im)?;
    Ok(Value::Complex(Complex64::new(re, im)))
}

/// `real`, `imag`, `conj`, `arg` over numbers, complex scalars, and complex
/// vectors. Real numbers behave as complex values with a zero imaginary
/// part.
pub(crate) fn accessor(builtin: Builtin, value: Value) -> EvalResult<Value> {
    match value {
        Value::Number(x) => {
            let z = Complex64::from(x);
            Ok(match builtin {
                Builtin::Real => Value::Number(z.re),
                Builtin::Imag => Value::Number(z.im),
                Builtin::Conj => Value::Number(x),
                Builtin::Arg => Value::Number(z.arg()),
                other => unreachable!("{other} is not a complex accessor"),
            })
        }
        Value::Complex(z) => Ok(match builtin {
            Builtin::Real => Value::Number(z.re),
            Builtin::Imag => Value::Number(z.im),
            Builtin::Conj => Value::Complex(z.conj()),
            Builtin::Arg => Value::Number(z.arg()),
            other => unreachable!("{other} is not a complex accessor"),
        }),
        Value::ComplexVector(v) => Ok(match builtin {
            Builtin::Real => Value::Vector(v.iter().map(|z| z.re).collect()),
            Builtin::Imag => Value::Vector(v.iter().map(|z| z.im).collect()),
            Builtin::Conj => Value::ComplexVector(v.iter().map(|z| z.conj()).collect()),
            Builtin::Arg => Value::Vector(v.iter().map(|z| z.arg()).collect()),
            other => unreachable!("{other} is not a complex accessor"),
        }),
        // Real vectors behave like complex vectors with zero imaginary parts.
        Value::Vector(v) => Ok(match builtin {
            Builtin::Real | Builtin::Conj => Value::Vector(v),
            Builtin::Imag => Value::Vector(vec![0.0; v.len()]),
            Builtin::Arg => Value::Vector(
                v.iter()
                    .map(|&x| if x < 0.0 { std::f64::consts::PI } else { 0.0 })
                    .collect(),
            ),
            other => unreachable!("{other} is not a complex accessor"),
        }),
        other => Err(Error::type_error(
            builtin.to_string(),
            "number, complex or vector",
            other.type_name(),
        )),
    }
}
