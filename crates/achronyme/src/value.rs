//! Runtime values and their textual rendering.
//!
//! Values are pure: no kernel or evaluator step mutates a value in place
//! across bindings; every operation returns a new value.

use std::fmt;

use num_complex::Complex64;

use crate::{error::EvalResult, function::Function, matrix::Matrix};

/// Tagged runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Complex(Complex64),
    /// The canonical container for sequences of reals.
    Vector(Vec<f64>),
    /// First-class complex sequence; `fft` and `ifft` both use it.
    ComplexVector(Vec<Complex64>),
    Matrix(Matrix),
    Function(Function),
    /// Named results of decompositions, e.g. `lu` returns `{L, U, P}`.
    Record(Vec<(&'static str, Value)>),
}

impl Value {
    /// Type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Complex(_) => "complex",
            Self::Vector(_) => "vector",
            Self::ComplexVector(_) => "complex vector",
            Self::Matrix(_) => "matrix",
            Self::Function(_) => "function",
            Self::Record(_) => "record",
        }
    }

    pub(crate) fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Numbers are truthy when nonzero. Other values have no truthiness.
    pub(crate) fn is_truthy(&self) -> Option<bool> {
        self.as_number().map(|n| n != 0.0)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Complex(z) => f.write_str(&format_complex(*z)),
            Self::Vector(v) => write_list(f, v.iter().map(|&x| format_number(x))),
            Self::ComplexVector(v) => write_list(f, v.iter().map(|&z| format_complex(z))),
            Self::Matrix(m) => {
                f.write_str("[")?;
                for r in 0..m.rows() {
                    if r > 0 {
                        f.write_str(", ")?;
                    }
                    write_list(f, m.row(r).iter().map(|&x| format_number(x)))?;
                }
                f.write_str("]")
            }
            Self::Function(_) => f.write_str("<function>"),
            Self::Record(fields) => {
                f.write_str("{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: impl Iterator<Item = String>) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        f.write_str(&item)?;
    }
    f.write_str("]")
}

/// Packs evaluated elements into the matching container value.
///
/// All numbers produce a `Vector`; a mix of numbers and complex scalars
/// promotes to a `ComplexVector`; equal-length vectors stack into a
/// `Matrix`. Anything else is a type error attributed to `operation`.
pub(crate) fn pack_elements(values: Vec<Value>, operation: &'static str) -> EvalResult<Value> {
    use crate::error::Error;

    if values.is_empty() {
        return Ok(Value::Vector(Vec::new()));
    }

    if values.iter().all(|v| matches!(v, Value::Number(_))) {
        return Ok(Value::Vector(
            values
                .into_iter()
                .map(|v| match v {
                    Value::Number(n) => n,
                    _ => unreachable!("all elements checked to be numbers"),
                })
                .collect(),
        ));
    }

    if values
        .iter()
        .all(|v| matches!(v, Value::Number(_) | Value::Complex(_)))
    {
        return Ok(Value::ComplexVector(
            values
                .into_iter()
                .map(|v| match v {
                    Value::Number(n) => Complex64::from(n),
                    Value::Complex(z) => z,
                    _ => unreachable!("all elements checked to be scalars"),
                })
                .collect(),
        ));
    }

    if values.iter().all(|v| matches!(v, Value::Vector(_))) {
        let rows: Vec<Vec<f64>> = values
            .into_iter()
            .map(|v| match v {
                Value::Vector(row) => row,
                _ => unreachable!("all elements checked to be vectors"),
            })
            .collect();
        let width = rows[0].len();
        for row in &rows {
            if row.len() != width {
                return Err(Error::Shape {
                    operation,
                    lhs: format!("{width}-vector"),
                    rhs: format!("{}-vector", row.len()),
                });
            }
        }
        let count = rows.len();
        let data: Vec<f64> = rows.into_iter().flatten().collect();
        return Ok(Value::Matrix(Matrix::new(count, width, data)?));
    }

    let offender = values
        .iter()
        .find(|v| !matches!(v, Value::Number(_) | Value::Complex(_) | Value::Vector(_)))
        .unwrap_or(&values[0]);
    Err(Error::type_error(
        operation,
        "numbers or equal-length vectors",
        offender.type_name(),
    ))
}

/// Renders a number as a decimal with trailing zeros trimmed.
///
/// `ryu` produces the shortest decimal representation that round-trips
/// through `f64` parsing; integral values lose the `.0` suffix so that
/// `14.0` renders as `14`. Non-finite values render as the literal strings
/// `Infinity`, `-Infinity` and `NaN`.
pub(crate) fn format_number(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_owned();
    }
    if x.is_infinite() {
        return if x.is_sign_negative() {
            "-Infinity".to_owned()
        } else {
            "Infinity".to_owned()
        };
    }
    if x == 0.0 {
        // Collapses -0.0 as well.
        return "0".to_owned();
    }
    let mut buffer = ryu::Buffer::new();
    let s = buffer.format_finite(x);
    match s.strip_suffix(".0") {
        Some(trimmed) => trimmed.to_owned(),
        None => s.to_owned(),
    }
}

/// Renders a complex number as `a + bi` / `a - bi`.
///
/// A zero imaginary part collapses to the real rendering; a zero real part
/// renders as `bi` alone.
pub(crate) fn format_complex(z: Complex64) -> String {
    if z.im == 0.0 {
        return format_number(z.re);
    }
    if z.re == 0.0 {
        return format!("{}i", format_number(z.im));
    }
    if z.im < 0.0 {
        format!("{} - {}i", format_number(z.re), format_number(-z.im))
    } else {
        format!("{} + {}i", format_number(z.re), format_number(z.im))
    }
}
