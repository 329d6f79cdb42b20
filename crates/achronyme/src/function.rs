//! Function values: user lambdas, builtin references, and compositions.

use std::rc::Rc;

use smallvec::SmallVec;

use crate::{builtins::Builtin, expressions::Expr, namespace::Frame};

/// A first-class function value.
#[derive(Debug, Clone, PartialEq)]
pub enum Function {
    /// User lambda carrying a by-value snapshot of the defining frame chain.
    Lambda(Rc<LambdaFunction>),
    /// Registry builtin referenced as a value, e.g. `map(sin, v)`.
    Builtin(Builtin),
    /// `compose(f, g, h)` applies right-to-left: `f(g(h(x)))`.
    Composed(Rc<Vec<Function>>),
}

impl Function {
    /// Name used in arity and callability errors.
    pub(crate) fn name(&self) -> String {
        match self {
            Self::Lambda(_) => "<lambda>".to_owned(),
            Self::Builtin(b) => b.to_string(),
            Self::Composed(_) => "<composed>".to_owned(),
        }
    }
}

/// A user lambda.
///
/// Capture is a by-value snapshot: the frame chain visible where the lambda
/// evaluates is cloned, so later rebindings in the enclosing scope are not
/// observed by the closure.
#[derive(Debug, PartialEq)]
pub struct LambdaFunction {
    pub(crate) params: SmallVec<[String; 4]>,
    pub(crate) body: Rc<Expr>,
    pub(crate) captured: Vec<Frame>,
}
