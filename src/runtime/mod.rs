//! Runtime: scopes, values, I/O port and the evaluator

pub mod environment;
pub mod evaluator;
pub mod scope;
pub mod value;

pub use environment::{ConsoleEnvironment, ConsoleOptions, Environment, ScriptedEnvironment};
pub use evaluator::{Evaluator, Flow, DEFAULT_MAX_CALL_DEPTH};
pub use scope::{Binding, ScopeChain};
