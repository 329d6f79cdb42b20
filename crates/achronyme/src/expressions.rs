//! AST node types produced by the parser and consumed by the evaluator.

use std::rc::Rc;

/// Binary operator tags.
///
/// Comparison operators evaluate to `1` for true and `0` for false; there is
/// no dedicated boolean value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub(crate) enum BinOp {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
    #[strum(serialize = "%")]
    Rem,
    #[strum(serialize = "^")]
    Pow,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = "<=")]
    Le,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = ">=")]
    Ge,
    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "!=")]
    Ne,
}

impl BinOp {
    /// True for the six comparison operators.
    pub fn is_comparison(self) -> bool {
        matches!(self, Self::Lt | Self::Le | Self::Gt | Self::Ge | Self::Eq | Self::Ne)
    }
}

/// Unary operator tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnOp {
    Neg,
}

/// An expression node.
///
/// `Call` carries a boxed callee expression rather than a bare name so the
/// grammar's postfix rule works on any primary: `(x => x * 2)(5)` and
/// `f(1)(2)` both parse.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Number(f64),
    /// An imaginary literal: the value times `i`.
    Imag(f64),
    Vector(Vec<Expr>),
    /// Rows are validated to equal length at parse time.
    Matrix(Vec<Vec<Expr>>),
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnOp,
        operand: Box<Expr>,
    },
    Var(String),
    Decl {
        name: String,
        init: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// The body is reference-counted so lambda values can share it with the
    /// tree without a deep clone.
    Lambda {
        params: Vec<String>,
        body: Rc<Expr>,
    },
    /// Expression list separated by `;`; the value is the last expression's.
    Sequence(Vec<Expr>),
}
