//! Built-in Functions Registry
//!
//! Built-ins resolve before user functions of the same name.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::utils::{Arity, Error, Result, Span};

/// A built-in function
#[derive(Debug, Clone, Copy)]
pub struct BuiltinFunc {
    pub name: &'static str,
    pub arity: Arity,
    /// Called only with an argument count that satisfies `arity`
    func: fn(&[Decimal]) -> Decimal,
}

impl BuiltinFunc {
    /// Check the argument count, then apply the function
    pub fn call(&self, args: &[Decimal], span: Span) -> Result<Decimal> {
        if !self.arity.accepts(args.len()) {
            return Err(Error::ArityMismatch {
                name: self.name.to_string(),
                expected: self.arity,
                got: args.len(),
                span,
            });
        }
        Ok((self.func)(args))
    }
}

/// Registry of all built-in functions
pub struct BuiltinRegistry {
    functions: HashMap<&'static str, BuiltinFunc>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            functions: HashMap::new(),
        };
        registry.register_all();
        registry
    }

    fn register_all(&mut self) {
        // absolute value
        self.register(BuiltinFunc {
            name: "muak",
            arity: Arity::Exactly(1),
            func: |args| args[0].abs(),
        });

        // minimum
        self.register(BuiltinFunc {
            name: "miniboss",
            arity: Arity::AtLeast(1),
            func: |args| args.iter().copied().min().unwrap_or_default(),
        });

        // maximum
        self.register(BuiltinFunc {
            name: "bigboss",
            arity: Arity::AtLeast(1),
            func: |args| args.iter().copied().max().unwrap_or_default(),
        });
    }

    fn register(&mut self, func: BuiltinFunc) {
        self.functions.insert(func.name, func);
    }

    /// Check if a function is a built-in
    pub fn is_builtin(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Get a built-in function by name
    pub fn get(&self, name: &str) -> Option<&BuiltinFunc> {
        self.functions.get(name)
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::new()
    }
}
