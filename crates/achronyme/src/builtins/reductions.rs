//! Reductions over real vectors: sum, mean, std, min, max.

use super::{vector_arg, Builtin};
use crate::{
    error::{Error, EvalResult},
    value::Value,
};

pub(crate) fn reduce_vector(builtin: Builtin, value: &Value) -> EvalResult<Value> {
    // `sum` of a matrix reduces over the flat data; the others want vectors.
    if builtin == Builtin::Sum {
        if let Value::Matrix(m) = value {
            return Ok(Value::Number(m.data().iter().sum()));
        }
    }
    let v = vector_arg(function_name(builtin), value)?;

    let out = match builtin {
        Builtin::Sum => v.iter().sum(),
        Builtin::Mean => {
            require_non_empty(builtin, v)?;
            v.iter().sum::<f64>() / v.len() as f64
        }
        Builtin::Std => {
            require_non_empty(builtin, v)?;
            // Population standard deviation.
            let mean = v.iter().sum::<f64>() / v.len() as f64;
            let variance = v.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / v.len() as f64;
            variance.sqrt()
        }
        Builtin::Min => {
            require_non_empty(builtin, v)?;
            v.iter().copied().fold(f64::INFINITY, f64::min)
        }
        Builtin::Max => {
            require_non_empty(builtin, v)?;
            v.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        }
        other => unreachable!("{other} is not a reduction"),
    };
    Ok(Value::Number(out))
}

fn require_non_empty(builtin: Builtin, v: &[f64]) -> EvalResult<()> {
    if v.is_empty() {
        return Err(Error::invalid_argument(
            function_name(builtin),
            "vector must be non-empty",
        ));
    }
    Ok(())
}

fn function_name(builtin: Builtin) -> &'static str {
    match builtin {
        Builtin::Sum => "sum",
        Builtin::Mean => "mean",
        Builtin::Std => "std",
        Builtin::Min => "min",
        Builtin::Max => "max",
        other => unreachable!("{other} is not a reduction"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_of_empty_vector_is_zero() {
        assert_eq!(
            reduce_vector(Builtin::Sum, &Value::Vector(vec![])).unwrap(),
            Value::Number(0.0)
        );
    }

    #[test]
    fn population_standard_deviation() {
        let v = Value::Vector(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(reduce_vector(Builtin::Std, &v).unwrap(), Value::Number(2.0));
    }

    #[test]
    fn mean_min_max() {
        let v = Value::Vector(vec![3.0, -1.0, 4.0]);
        assert_eq!(reduce_vector(Builtin::Mean, &v).unwrap(), Value::Number(2.0));
        assert_eq!(reduce_vector(Builtin::Min, &v).unwrap(), Value::Number(-1.0));
        assert_eq!(reduce_vector(Builtin::Max, &v).unwrap(), Value::Number(4.0));
    }

    #[test]
    fn mean_of_empty_vector_is_rejected() {
        let err = reduce_vector(Builtin::Mean, &Value::Vector(vec![])).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }
}
