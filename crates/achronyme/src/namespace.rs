//! Lexically-scoped name bindings.
//!
//! The environment is a stack of frames. Lookup walks frames inner-to-outer;
//! `let` rebinds in the topmost frame, overwriting any prior binding there.
//! The root frame persists across top-level evaluations so REPL-style use
//! retains user bindings.

use ahash::AHashMap;

use crate::value::Value;

/// One scope level: a name-to-value mapping. Insertion order is irrelevant.
pub(crate) type Frame = AHashMap<String, Value>;

#[derive(Debug, Clone)]
pub(crate) struct Environment {
    frames: Vec<Frame>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::default()],
        }
    }

    /// Rebuilds an environment from a captured frame chain, with a fresh
    /// frame on top for the call's parameter bindings.
    pub fn from_captured(captured: Vec<Frame>) -> Self {
        let mut frames = captured;
        frames.push(Frame::default());
        Self { frames }
    }

    /// Inner-to-outer lookup.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Binds in the topmost frame, overwriting any prior binding there.
    pub fn bind(&mut self, name: String, value: Value) {
        self.frames
            .last_mut()
            .expect("environment always has a root frame")
            .insert(name, value);
    }

    /// Snapshot of the visible frame chain, cloned by value.
    pub fn capture(&self) -> Vec<Frame> {
        self.frames.clone()
    }

    /// Pops all frames above the root and clears root bindings.
    pub fn reset(&mut self) {
        self.frames.truncate(1);
        self.frames[0].clear();
    }

    /// Names bound in the root frame, sorted for stable host output.
    pub fn root_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.frames[0].keys().cloned().collect();
        names.sort_unstable();
        names
    }
}
