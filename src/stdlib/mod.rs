//! Standard library

pub mod builtins;

pub use builtins::{BuiltinFunc, BuiltinRegistry};
