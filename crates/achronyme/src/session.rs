//! Persistent engine session: the boundary a host SDK wraps.
//!
//! A `Session` keeps evaluator state across `eval()` calls so interactive
//! snippets share variables, and owns the handle table used for zero-copy
//! host access. Fast-path methods invoke kernels on handles directly,
//! bypassing the parser.

use crate::{
    builtins::{self},
    error::{Error, EvalResult},
    evaluate::Interpreter,
    handles::HandleId,
    matrix::Matrix,
    value::Value,
};

pub struct Session {
    interp: Interpreter,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            interp: Interpreter::new(),
        }
    }

    /// Evaluates a source string and renders the result.
    pub fn eval(&mut self, source: &str) -> EvalResult<String> {
        self.eval_value(source).map(|value| value.to_string())
    }

    /// Evaluates a source string, returning the structured value.
    pub fn eval_value(&mut self, source: &str) -> EvalResult<Value> {
        self.interp.eval_source(source)
    }

    /// Clears user bindings; builtins and live handles survive.
    pub fn reset(&mut self) {
        self.interp.reset();
    }

    /// Names bound in the root scope, sorted.
    pub fn list_variables(&self) -> Vec<String> {
        self.interp.root_names()
    }

    // ------------------------------------------------------------------
    // Handle operations
    // ------------------------------------------------------------------

    /// Copies a host buffer into a new vector value owned by the table.
    pub fn create_vector(&mut self, data: &[f64]) -> HandleId {
        self.interp.handles_mut().insert(Value::Vector(data.to_vec()))
    }

    /// Copies a host buffer into a new row-major matrix value.
    pub fn create_matrix(&mut self, rows: usize, cols: usize, data: &[f64]) -> EvalResult<HandleId> {
        let matrix = Matrix::new(rows, cols, data.to_vec())?;
        Ok(self.interp.handles_mut().insert(Value::Matrix(matrix)))
    }

    /// Binds a handle to a name visible to parsed expressions.
    pub fn bind(&mut self, name: &str, handle: HandleId) -> EvalResult<()> {
        self.interp.bind_handle(name, handle)
    }

    /// Stable pointer to the handle's storage for zero-copy host reads.
    ///
    /// The address stays valid until the next call that may touch the
    /// table; hosts must not mutate through it.
    pub fn data_ptr(&self, handle: HandleId) -> EvalResult<*const f64> {
        self.interp.handles().data(handle).map(<[f64]>::as_ptr)
    }

    /// Element count of the handle's storage.
    pub fn len(&self, handle: HandleId) -> EvalResult<usize> {
        self.interp.handles().data(handle).map(<[f64]>::len)
    }

    /// Borrow of the handle's storage, for in-process hosts.
    pub fn data(&self, handle: HandleId) -> EvalResult<&[f64]> {
        self.interp.handles().data(handle)
    }

    /// Drops the handle. Every later use of it fails with `UnknownHandle`.
    pub fn release(&mut self, handle: HandleId) -> EvalResult<()> {
        self.interp.handles_mut().release(handle)
    }

    // ------------------------------------------------------------------
    // Fast-path kernels on handles (no parsing involved)
    // ------------------------------------------------------------------

    /// Applies a unary element-wise builtin (`sin`, `exp`, ...) to a
    /// handle's data, producing a new handle.
    pub fn unary_fast(&mut self, function: &str, handle: HandleId) -> EvalResult<HandleId> {
        let Some(builtin) = builtins::lookup(function) else {
            return Err(Error::UndefinedVariable(function.to_owned()));
        };
        let input = self.interp.handles().get(handle)?.clone();
        let output = builtin.call(vec![input], &mut self.interp)?;
        match output {
            Value::Vector(_) | Value::Matrix(_) => Ok(self.interp.handles_mut().insert(output)),
            other => Err(Error::type_error(
                "unary_fast",
                "vector or matrix result",
                other.type_name(),
            )),
        }
    }

    /// FFT over a vector handle. The complex result is materialized as an
    /// `(N, 2)` matrix handle: column 0 real, column 1 imaginary.
    pub fn fft_fast(&mut self, handle: HandleId) -> EvalResult<HandleId> {
        let input = self.interp.handles().data(handle)?.to_vec();
        let bins = crate::dsp::fft::fft(&crate::dsp::fft::to_complex(&input));
        let mut data = Vec::with_capacity(bins.len() * 2);
        for bin in &bins {
            data.extend_from_slice(&[bin.re, bin.im]);
        }
        let matrix = Matrix::new(bins.len(), 2, data)?;
        Ok(self.interp.handles_mut().insert(Value::Matrix(matrix)))
    }

    /// LU factorization of a matrix handle; returns `(l, u, p)` handles.
    pub fn lu_fast(&mut self, handle: HandleId) -> EvalResult<(HandleId, HandleId, HandleId)> {
        let Value::Matrix(matrix) = self.interp.handles().get(handle)?.clone() else {
            return Err(Error::type_error("lu_fast", "matrix", "vector"));
        };
        let factors = crate::linalg::lu::lu(&matrix)?;
        let p = factors.permutation_matrix();
        let handles = self.interp.handles_mut();
        let l = handles.insert(Value::Matrix(factors.l));
        let u = handles.insert(Value::Matrix(factors.u));
        let p = handles.insert(Value::Matrix(p));
        Ok((l, u, p))
    }
}
