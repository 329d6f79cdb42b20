//! Typed failure states surfaced by every stage of the engine pipeline.
//!
//! Every error is surfaced to the caller immediately; the evaluator never
//! recovers locally. Lex and parse errors carry a character offset into the
//! source string; runtime errors carry the operation or function name that
//! rejected its input.

use crate::builtins::Arity;

/// Character offset into the source string.
pub type Position = usize;

/// Crate-wide result alias.
pub type EvalResult<T> = Result<T, Error>;

/// All failure states of the engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Unrecognized character or malformed literal.
    #[error("lex error at offset {position}: {message}")]
    Lex { position: Position, message: String },

    /// Syntactic mismatch. `found` describes the offending token.
    #[error("parse error at offset {position}: expected {expected}, found {found}")]
    Parse {
        position: Position,
        expected: String,
        found: String,
    },

    /// Reference to a name with no binding in any visible frame.
    #[error("undefined variable `{0}`")]
    UndefinedVariable(String),

    /// A call supplied the wrong number of arguments.
    #[error("{function}() expects {expected}, received {received}")]
    ArityMismatch {
        function: String,
        expected: Arity,
        received: usize,
    },

    /// Operand types incompatible with the operation.
    #[error("type error in {operation}: expected {expected}, received {received}")]
    Type {
        operation: String,
        expected: &'static str,
        received: &'static str,
    },

    /// Dimension mismatch in a vector or matrix operation.
    #[error("shape mismatch in {operation}: {lhs} vs {rhs}")]
    Shape {
        operation: &'static str,
        lhs: String,
        rhs: String,
    },

    /// A pivot vanished after pivot selection.
    #[error("matrix is singular")]
    Singular,

    /// Cholesky precondition violated.
    #[error("matrix is not symmetric positive-definite")]
    NotSpd,

    /// An iterative kernel exhausted its iteration budget.
    #[error("did not converge after {iterations} iterations")]
    NonConvergent { iterations: usize },

    /// A call target that is not a function value.
    #[error("`{0}` is not callable")]
    NotCallable(String),

    /// The referenced handle is not live.
    #[error("unknown handle {0}")]
    UnknownHandle(u64),

    /// An argument outside a function's domain, e.g. `hanning(1)`.
    #[error("invalid argument to {function}(): {reason}")]
    InvalidArgument {
        function: &'static str,
        reason: String,
    },
}

impl Error {
    /// Shorthand for a [`Error::Type`] with the given operation name.
    pub(crate) fn type_error(
        operation: impl Into<String>,
        expected: &'static str,
        received: &'static str,
    ) -> Self {
        Self::Type {
            operation: operation.into(),
            expected,
            received,
        }
    }

    /// Shorthand for a [`Error::InvalidArgument`].
    pub(crate) fn invalid_argument(function: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            function,
            reason: reason.into(),
        }
    }
}
