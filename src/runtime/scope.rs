//! Scope chain for name resolution

use std::collections::HashMap;

use log::trace;
use rust_decimal::Decimal;

use crate::utils::{Error, Result, Span};

/// A value bound to a name
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Binding {
    pub value: Decimal,
    /// `false` for `trusela` constants
    pub mutable: bool,
}

/// Stack of scopes, innermost last. Scope 0 is the global scope.
///
/// A function call starts a frame: while it is active, lookups see the
/// frame's own scopes and the global scope, never the caller's locals.
#[derive(Debug)]
pub struct ScopeChain {
    scopes: Vec<HashMap<String, Binding>>,
    /// Index of the first scope of each active call frame
    frames: Vec<usize>,
}

impl ScopeChain {
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
            frames: Vec::new(),
        }
    }

    /// Number of scopes, global included
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
        trace!("push scope (depth {})", self.scopes.len());
    }

    /// Pop the innermost scope. The global scope is never popped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
        trace!("pop scope (depth {})", self.scopes.len());
    }

    /// Start a call frame with one fresh scope for the parameters
    pub fn push_frame(&mut self) {
        self.frames.push(self.scopes.len());
        self.push_scope();
    }

    /// Drop the innermost call frame and every scope it pushed
    pub fn pop_frame(&mut self) {
        if let Some(base) = self.frames.pop() {
            self.scopes.truncate(base.max(1));
        }
        trace!("pop frame (depth {})", self.scopes.len());
    }

    /// Scope indices visible from the current position, innermost first
    fn visible(&self) -> impl Iterator<Item = usize> {
        let base = self.frames.last().copied().unwrap_or(0);
        let global = if base > 0 { Some(0) } else { None };
        (base..self.scopes.len()).rev().chain(global)
    }

    /// Bind `name` in the innermost scope
    pub fn define(&mut self, name: &str, binding: Binding, span: Span) -> Result<()> {
        let innermost = self.scopes.len() - 1;
        let scope = &mut self.scopes[innermost];
        if scope.contains_key(name) {
            return Err(Error::DuplicateDeclaration {
                name: name.to_string(),
                span,
            });
        }
        scope.insert(name.to_string(), binding);
        Ok(())
    }

    /// Look up a name, searching from the innermost visible scope outward
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.visible().find_map(|i| self.scopes[i].get(name))
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Binding> {
        let index = self.visible().find(|&i| self.scopes[i].contains_key(name))?;
        self.scopes[index].get_mut(name)
    }
}

impl Default for ScopeChain {
    fn default() -> Self {
        Self::new()
    }
}
