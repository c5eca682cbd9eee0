//! Utility module

mod span;
mod error;

pub use span::Span;
pub use error::{Arity, Error, Phase, Result};
