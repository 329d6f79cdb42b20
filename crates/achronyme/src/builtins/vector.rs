//! Vector builtins: dot, cross, norm, normalize, linspace.

use super::{index_arg, number_arg, vector_arg};
use crate::{
    error::{Error, EvalResult},
    linalg,
    value::Value,
};

pub(crate) fn dot(a: &Value, b: &Value) -> EvalResult<Value> {
    let a = vector_arg("dot", a)?;
    let b = vector_arg("dot", b)?;
    if a.len() != b.len() {
        return Err(Error::Shape {
            operation: "dot",
            lhs: format!("{}-vector", a.len()),
            rhs: format!("{}-vector", b.len()),
        });
    }
    Ok(Value::Number(a.iter().zip(b).map(|(x, y)| x * y).sum()))
}

/// Cross product, defined for 3-dimensional vectors only.
pub(crate) fn cross(a: &Value, b: &Value) -> EvalResult<Value> {
    let a = vector_arg("cross", a)?;
    let b = vector_arg("cross", b)?;
    if a.len() != 3 || b.len() != 3 {
        return Err(Error::invalid_argument(
            "cross",
            format!("requires 3-dimensional vectors, got {} and {}", a.len(), b.len()),
        ));
    }
    Ok(Value::Vector(vec![
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]))
}

pub(crate) fn norm(value: &Value) -> EvalResult<Value> {
    let v = vector_arg("norm", value)?;
    Ok(Value::Number(linalg::norm(v)))
}

pub(crate) fn normalize(value: &Value) -> EvalResult<Value> {
    let v = vector_arg("normalize", value)?;
    let length = linalg::norm(v);
    if length == 0.0 {
        return Err(Error::invalid_argument("normalize", "cannot normalize the zero vector"));
    }
    Ok(Value::Vector(v.iter().map(|&x| x / length).collect()))
}

/// `linspace(start, stop, count)`: `count` evenly spaced samples, endpoints
/// included.
pub(crate) fn linspace(start: &Value, stop: &Value, count: &Value) -> EvalResult<Value> {
    let start = number_arg("linspace", start)?;
    let stop = number_arg("linspace", stop)?;
    let count = index_arg("linspace", count)?;
    if count == 0 {
        return Err(Error::invalid_argument("linspace", "count must be at least 1"));
    }
    if count == 1 {
        return Ok(Value::Vector(vec![start]));
    }
    let step = (stop - start) / (count - 1) as f64;
    Ok(Value::Vector(
        (0..count).map(|i| start + step * i as f64).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_product() {
        let out = dot(
            &Value::Vector(vec![1.0, 2.0, 3.0]),
            &Value::Vector(vec![4.0, 5.0, 6.0]),
        )
        .unwrap();
        assert_eq!(out, Value::Number(32.0));
    }

    #[test]
    fn dot_requires_equal_lengths() {
        let err = dot(&Value::Vector(vec![1.0]), &Value::Vector(vec![1.0, 2.0])).unwrap_err();
        assert!(matches!(err, Error::Shape { .. }));
    }

    #[test]
    fn cross_product_of_the_standard_basis() {
        let out = cross(
            &Value::Vector(vec![1.0, 0.0, 0.0]),
            &Value::Vector(vec![0.0, 1.0, 0.0]),
        )
        .unwrap();
        assert_eq!(out, Value::Vector(vec![0.0, 0.0, 1.0]));
    }

    #[test]
    fn cross_rejects_non_3d_vectors() {
        let err = cross(&Value::Vector(vec![1.0, 2.0]), &Value::Vector(vec![3.0, 4.0])).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[test]
    fn normalize_produces_a_unit_vector() {
        let out = normalize(&Value::Vector(vec![3.0, 4.0])).unwrap();
        assert_eq!(out, Value::Vector(vec![0.6, 0.8]));
    }

    #[test]
    fn normalize_rejects_the_zero_vector() {
        assert!(normalize(&Value::Vector(vec![0.0, 0.0])).is_err());
    }

    #[test]
    fn linspace_includes_both_endpoints() {
        let out = linspace(&Value::Number(0.0), &Value::Number(1.0), &Value::Number(5.0)).unwrap();
        assert_eq!(out, Value::Vector(vec![0.0, 0.25, 0.5, 0.75, 1.0]));
    }
}
