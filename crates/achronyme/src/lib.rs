//! Achronyme core: a mathematical computation engine.
//!
//! The engine is a small expression language (lexer, recursive-descent
//! parser, tree-walking evaluator with first-class lambdas and closures)
//! over a dynamically-typed value model, dispatching into numerical kernels
//! for DSP (FFT/IFFT, convolution, windows) and linear algebra (LU, QR,
//! Cholesky, SVD, eigensolvers).
//!
//! [`Session`] is the host-facing entry point:
//!
//! ```
//! use achronyme::Session;
//!
//! let mut session = Session::new();
//! assert_eq!(session.eval("let sq = x => x * x; map(sq, [1, 2, 3, 4])").unwrap(), "[1, 4, 9, 16]");
//! assert_eq!(session.eval("sq(9)").unwrap(), "81");
//! ```

mod arith;
mod builtins;
mod dsp;
mod error;
mod evaluate;
mod expressions;
mod function;
mod handles;
mod lexer;
mod linalg;
mod matrix;
mod namespace;
mod parse;
mod session;
mod value;

pub use num_complex::Complex64;

pub use crate::{
    builtins::{Arity, Builtin},
    error::{Error, EvalResult, Position},
    function::{Function, LambdaFunction},
    handles::HandleId,
    matrix::Matrix,
    session::Session,
    value::Value,
};
