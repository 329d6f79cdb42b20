//! Tree-walking evaluator with a persistent root environment.
//!
//! Evaluation is a post-order walk. Sub-expressions evaluate strictly left
//! to right; call arguments are fully evaluated before dispatch. A fresh
//! frame backs every user-function call and is discarded on every exit
//! path, including errors. An error aborts the whole top-level evaluation
//! but leaves any `let` bindings that completed beforehand in place.

use std::rc::Rc;

use ahash::AHashMap;
use smallvec::SmallVec;

use crate::{
    arith, builtins,
    error::{Error, EvalResult},
    expressions::{Expr, UnOp},
    function::{Function, LambdaFunction},
    handles::{HandleId, HandleTable},
    matrix::Matrix,
    namespace::Environment,
    parse::parse,
    value::{pack_elements, Value},
};

pub(crate) struct Interpreter {
    /// Root environment; survives across top-level evaluations.
    env: Environment,
    /// Host-owned vectors and matrices.
    handles: HandleTable,
    /// Names bound to handles by the host. Consulted after the environment,
    /// so a released handle surfaces as `UnknownHandle` rather than
    /// silently shadowing.
    handle_bindings: AHashMap<String, HandleId>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
            handles: HandleTable::default(),
            handle_bindings: AHashMap::new(),
        }
    }

    /// Parses and evaluates a source string against the persistent
    /// environment.
    pub fn eval_source(&mut self, source: &str) -> EvalResult<Value> {
        let expr = parse(source)?;
        // The environment is moved out for the walk so user-function calls
        // can borrow the interpreter mutably alongside their own frames.
        let mut env = std::mem::take(&mut self.env);
        let result = self.eval(&expr, &mut env);
        self.env = env;
        result
    }

    /// Clears user bindings and handle names; the builtin registry and live
    /// handles are unaffected.
    pub fn reset(&mut self) {
        self.env.reset();
        self.handle_bindings.clear();
    }

    pub fn root_names(&self) -> Vec<String> {
        self.env.root_names()
    }

    pub fn handles(&self) -> &HandleTable {
        &self.handles
    }

    pub fn handles_mut(&mut self) -> &mut HandleTable {
        &mut self.handles
    }

    /// Binds `name` to a live handle in the root scope.
    pub fn bind_handle(&mut self, name: &str, handle: HandleId) -> EvalResult<()> {
        self.handles.get(handle)?;
        self.handle_bindings.insert(name.to_owned(), handle);
        Ok(())
    }

    fn eval(&mut self, expr: &Expr, env: &mut Environment) -> EvalResult<Value> {
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Imag(n) => Ok(Value::Complex(num_complex::Complex64::new(0.0, *n))),

            Expr::Vector(elements) => {
                let values: Vec<Value> = elements
                    .iter()
                    .map(|e| self.eval(e, env))
                    .collect::<EvalResult<_>>()?;
                pack_elements(values, "vector literal")
            }

            Expr::Matrix(rows) => {
                let cols = rows[0].len();
                let mut data = Vec::with_capacity(rows.len() * cols);
                for row in rows {
                    for element in row {
                        let value = self.eval(element, env)?;
                        match value {
                            Value::Number(n) => data.push(n),
                            other => {
                                return Err(Error::type_error(
                                    "matrix literal",
                                    "number",
                                    other.type_name(),
                                ));
                            }
                        }
                    }
                }
                Ok(Value::Matrix(Matrix::new(rows.len(), cols, data)?))
            }

            Expr::Binary { op, left, right } => {
                let lhs = self.eval(left, env)?;
                let rhs = self.eval(right, env)?;
                arith::binary(*op, lhs, rhs)
            }

            Expr::Unary { op: UnOp::Neg, operand } => {
                let value = self.eval(operand, env)?;
                arith::negate(value)
            }

            Expr::Var(name) => self.resolve(name, env),

            Expr::Decl { name, init } => {
                let value = self.eval(init, env)?;
                env.bind(name.clone(), value.clone());
                Ok(value)
            }

            Expr::Lambda { params, body } => {
                Ok(Value::Function(Function::Lambda(Rc::new(LambdaFunction {
                    params: params.iter().cloned().collect::<SmallVec<[String; 4]>>(),
                    body: Rc::clone(body),
                    captured: env.capture(),
                }))))
            }

            Expr::Sequence(exprs) => {
                let mut last = Value::Number(0.0);
                for e in exprs {
                    last = self.eval(e, env)?;
                }
                Ok(last)
            }

            Expr::Call { callee, args } => self.eval_call(callee, args, env),
        }
    }

    /// Name resolution order: environment frames (inner to outer), then
    /// host handle bindings, then constants, then builtin functions as
    /// first-class values.
    fn resolve(&self, name: &str, env: &Environment) -> EvalResult<Value> {
        if let Some(value) = env.lookup(name) {
            return Ok(value.clone());
        }
        if let Some(&handle) = self.handle_bindings.get(name) {
            return self.handles.get(handle).cloned();
        }
        if let Some(constant) = builtins::constant(name) {
            return Ok(Value::Number(constant));
        }
        if let Some(builtin) = builtins::lookup(name) {
            return Ok(Value::Function(Function::Builtin(builtin)));
        }
        Err(Error::UndefinedVariable(name.to_owned()))
    }

    fn eval_call(&mut self, callee: &Expr, args: &[Expr], env: &mut Environment) -> EvalResult<Value> {
        // A named callee dispatches to the registry first, per the language
        // contract; only unregistered names fall back to the environment.
        if let Expr::Var(name) = callee {
            if let Some(builtin) = builtins::lookup(name) {
                let values = self.eval_args(args, env)?;
                return builtin.call(values, self);
            }
            let resolved = self.resolve(name, env)?;
            let Value::Function(function) = resolved else {
                return Err(Error::NotCallable(name.clone()));
            };
            let values = self.eval_args(args, env)?;
            return self.call_function(&function, values);
        }

        let callee_value = self.eval(callee, env)?;
        let Value::Function(function) = callee_value else {
            return Err(Error::NotCallable(callee_value.type_name().to_owned()));
        };
        let values = self.eval_args(args, env)?;
        self.call_function(&function, values)
    }

    fn eval_args(&mut self, args: &[Expr], env: &mut Environment) -> EvalResult<Vec<Value>> {
        args.iter().map(|a| self.eval(a, env)).collect()
    }

    /// Invokes a function value with already-evaluated arguments.
    pub(crate) fn call_function(&mut self, function: &Function, args: Vec<Value>) -> EvalResult<Value> {
        match function {
            Function::Lambda(lambda) => {
                if args.len() != lambda.params.len() {
                    return Err(Error::ArityMismatch {
                        function: function.name(),
                        expected: builtins::Arity::Exact(lambda.params.len()),
                        received: args.len(),
                    });
                }
                // The call environment is the captured chain plus one fresh
                // frame for the parameters; dropping it pops the frame on
                // every exit path.
                let mut call_env = Environment::from_captured(lambda.captured.clone());
                for (param, arg) in lambda.params.iter().zip(args) {
                    call_env.bind(param.clone(), arg);
                }
                self.eval(&lambda.body, &mut call_env)
            }
            Function::Builtin(builtin) => builtin.call(args, self),
            Function::Composed(stages) => {
                if args.len() != 1 {
                    return Err(Error::ArityMismatch {
                        function: function.name(),
                        expected: builtins::Arity::Exact(1),
                        received: args.len(),
                    });
                }
                let mut value = args.into_iter().next().expect("arity checked");
                for stage in stages.iter().rev() {
                    value = self.call_function(stage, vec![value])?;
                }
                Ok(value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(source: &str) -> EvalResult<Value> {
        Interpreter::new().eval_source(source)
    }

    #[test]
    fn precedence_and_grouping() {
        assert_eq!(eval("2 + 3 * 4").unwrap(), Value::Number(14.0));
        assert_eq!(eval("(2 + 3) * 4").unwrap(), Value::Number(20.0));
        assert_eq!(eval("2 ^ 3 ^ 2").unwrap(), Value::Number(512.0));
    }

    #[test]
    fn unary_minus_binds_tighter_than_power() {
        // The grammar parses -2 ^ 2 as (-2) ^ 2.
        assert_eq!(eval("-2 ^ 2").unwrap(), Value::Number(4.0));
        assert_eq!(eval("2 ^ -1").unwrap(), Value::Number(0.5));
    }

    #[test]
    fn sequences_yield_the_last_value() {
        assert_eq!(eval("1; 2; 3").unwrap(), Value::Number(3.0));
    }

    #[test]
    fn declarations_return_and_persist() {
        let mut interp = Interpreter::new();
        assert_eq!(interp.eval_source("let x = 5").unwrap(), Value::Number(5.0));
        assert_eq!(interp.eval_source("x + 1").unwrap(), Value::Number(6.0));
    }

    #[test]
    fn closures_capture_by_value() {
        // The captured frame chain is a snapshot: rebinding x afterwards is
        // not observed by the closure.
        let out = eval("let x = 5; let f = y => x + y; let x = 100; f(3)").unwrap();
        assert_eq!(out, Value::Number(8.0));
    }

    #[test]
    fn lambda_arity_is_checked() {
        let err = eval("let f = (a, b) => a + b; f(1)").unwrap_err();
        assert!(matches!(err, Error::ArityMismatch { .. }));
    }

    #[test]
    fn calling_a_number_is_not_callable() {
        let err = eval("let x = 4; x(1)").unwrap_err();
        assert_eq!(err, Error::NotCallable("x".to_owned()));
    }

    #[test]
    fn undefined_variables_error() {
        assert_eq!(eval("nope").unwrap_err(), Error::UndefinedVariable("nope".to_owned()));
    }

    #[test]
    fn builtins_dispatch_before_environment_bindings() {
        // Per the call contract, a registered name keeps its registry
        // meaning even when shadowed by a variable.
        let out = eval("let sin = 3; sin(0)").unwrap();
        assert_eq!(out, Value::Number(0.0));
    }

    #[test]
    fn constants_resolve_case_insensitively() {
        assert_eq!(eval("PI").unwrap(), Value::Number(std::f64::consts::PI));
    }

    #[test]
    fn failed_evaluation_keeps_completed_bindings() {
        let mut interp = Interpreter::new();
        assert!(interp.eval_source("let a = 1; nope").is_err());
        assert_eq!(interp.eval_source("a").unwrap(), Value::Number(1.0));
    }

    #[test]
    fn vector_literal_with_complex_entry_promotes() {
        let out = eval("[1, 2i]").unwrap();
        let Value::ComplexVector(v) = out else { panic!("expected complex vector") };
        assert_eq!(v[0], num_complex::Complex64::new(1.0, 0.0));
        assert_eq!(v[1], num_complex::Complex64::new(0.0, 2.0));
    }

    #[test]
    fn vector_of_vectors_becomes_a_matrix() {
        let out = eval("let r = [1, 2]; [r, [3, 4]]").unwrap();
        let Value::Matrix(m) = out else { panic!("expected matrix") };
        assert_eq!((m.rows(), m.cols()), (2, 2));
    }

    #[test]
    fn immediate_lambda_call() {
        assert_eq!(eval("(x => x * 2)(5)").unwrap(), Value::Number(10.0));
    }

    #[test]
    fn curried_calls_through_returned_lambdas() {
        let out = eval("let add = a => b => a + b; add(2)(3)").unwrap();
        assert_eq!(out, Value::Number(5.0));
    }

    #[test]
    fn reset_clears_user_bindings() {
        let mut interp = Interpreter::new();
        interp.eval_source("let x = 1").unwrap();
        interp.reset();
        assert!(matches!(
            interp.eval_source("x"),
            Err(Error::UndefinedVariable(_))
        ));
    }
}
