//! Higher-order builtins: map, filter, reduce, pipe, compose.
//!
//! These are the only builtins that call back into the evaluator, since
//! their function arguments may be user lambdas with captured frames.

use std::rc::Rc;

use super::{function_arg, vector_arg};
use crate::{
    error::{Error, EvalResult},
    evaluate::Interpreter,
    function::Function,
    value::{pack_elements, Value},
};

/// `map(f, v, ...)`: applies `f` across one or more vectors position by
/// position. Differing lengths truncate to the shortest; `f`'s arity must
/// equal the number of vectors.
pub(crate) fn map(args: Vec<Value>, interp: &mut Interpreter) -> EvalResult<Value> {
    let mut iter = args.into_iter();
    let f = iter.next().expect("arity checked");
    let f = function_arg("map", &f)?.clone();

    let collections: Vec<Vec<f64>> = iter
        .map(|arg| vector_arg("map", &arg).map(<[f64]>::to_vec))
        .collect::<EvalResult<_>>()?;
    let shortest = collections.iter().map(Vec::len).min().unwrap_or(0);

    let mut results = Vec::with_capacity(shortest);
    for index in 0..shortest {
        let call_args: Vec<Value> = collections.iter().map(|c| Value::Number(c[index])).collect();
        results.push(interp.call_function(&f, call_args)?);
    }
    pack_elements(results, "map")
}

/// `filter(pred, v)`: keeps elements whose predicate result is nonzero.
pub(crate) fn filter(predicate: &Value, v: &Value, interp: &mut Interpreter) -> EvalResult<Value> {
    let predicate = function_arg("filter", predicate)?.clone();
    let v = vector_arg("filter", v)?.to_vec();

    let mut kept = Vec::new();
    for x in v {
        let verdict = interp.call_function(&predicate, vec![Value::Number(x)])?;
        let keep = verdict
            .is_truthy()
            .ok_or_else(|| Error::type_error("filter", "numeric predicate result", verdict.type_name()))?;
        if keep {
            kept.push(x);
        }
    }
    Ok(Value::Vector(kept))
}

/// `reduce(f, init, v)`: strict left fold in index order.
pub(crate) fn reduce(f: &Value, init: Value, v: &Value, interp: &mut Interpreter) -> EvalResult<Value> {
    let f = function_arg("reduce", f)?.clone();
    let v = vector_arg("reduce", v)?.to_vec();

    let mut accumulator = init;
    for x in v {
        accumulator = interp.call_function(&f, vec![accumulator, Value::Number(x)])?;
    }
    Ok(accumulator)
}

/// `pipe(x, f1, ..., fn)`: threads `x` through unary functions left to
/// right.
pub(crate) fn pipe(args: Vec<Value>, interp: &mut Interpreter) -> EvalResult<Value> {
    let mut iter = args.into_iter();
    let mut value = iter.next().expect("arity checked");
    for stage in iter {
        let f = function_arg("pipe", &stage)?;
        value = interp.call_function(f, vec![value])?;
    }
    Ok(value)
}

/// `compose(f1, ..., fn)`: a new unary function applying `fn` first and
/// `f1` last.
pub(crate) fn compose(args: Vec<Value>) -> EvalResult<Value> {
    let functions: Vec<Function> = args
        .iter()
        .map(|arg| function_arg("compose", arg).cloned())
        .collect::<EvalResult<_>>()?;
    Ok(Value::Function(Function::Composed(Rc::new(functions))))
}
