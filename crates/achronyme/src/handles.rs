//! Host-facing handle table for zero-copy access to vectors and matrices.
//!
//! Handles are small integers that stay stable for the lifetime of the
//! referenced value. IDs are never reused within a process lifetime; a
//! released handle answers [`Error::UnknownHandle`] forever after.

use std::fmt;

use ahash::AHashMap;

use crate::{
    error::{Error, EvalResult},
    value::Value,
};

/// Opaque handle identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(u64);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Default)]
pub(crate) struct HandleTable {
    entries: AHashMap<u64, Value>,
    next_id: u64,
}

impl HandleTable {
    /// Stores a value (always a vector or matrix) and returns its handle.
    pub fn insert(&mut self, value: Value) -> HandleId {
        debug_assert!(
            matches!(value, Value::Vector(_) | Value::Matrix(_)),
            "handles only reference vectors and matrices"
        );
        self.next_id += 1;
        let id = self.next_id;
        self.entries.insert(id, value);
        HandleId(id)
    }

    pub fn get(&self, handle: HandleId) -> EvalResult<&Value> {
        self.entries
            .get(&handle.0)
            .ok_or(Error::UnknownHandle(handle.0))
    }

    /// Contiguous float storage of the referenced value.
    pub fn data(&self, handle: HandleId) -> EvalResult<&[f64]> {
        match self.get(handle)? {
            Value::Vector(v) => Ok(v),
            Value::Matrix(m) => Ok(m.data()),
            _ => unreachable!("handles only reference vectors and matrices"),
        }
    }

    pub fn release(&mut self, handle: HandleId) -> EvalResult<()> {
        self.entries
            .remove(&handle.0)
            .map(|_| ())
            .ok_or(Error::UnknownHandle(handle.0))
    }
}
