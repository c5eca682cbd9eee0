//! Error handling for Minion

use std::fmt;

use crate::utils::Span;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Number of arguments a callable accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "{}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

/// Which stage of the pipeline produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lex,
    Syntax,
    Runtime,
    Environment,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Lex => "lex",
            Phase::Syntax => "syntax",
            Phase::Runtime => "runtime",
            Phase::Environment => "environment",
        };
        f.write_str(name)
    }
}

/// Interpreter error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ==================== Lexer Errors ====================

    #[error("Malformed number literal: '{lexeme}'")]
    Lex { lexeme: String, span: Span },

    // ==================== Parser Errors ====================

    #[error("Unexpected token: expected {expected}, got {got}")]
    UnexpectedToken {
        expected: String,
        got: String,
        span: Span,
    },

    #[error("Unexpected end of input: expected {expected}")]
    UnexpectedEof { expected: String, span: Span },

    #[error("Invalid number literal: '{lexeme}'")]
    InvalidNumber { lexeme: String, span: Span },

    #[error("Unsupported type '{name}': only Papaya is supported")]
    UnsupportedType { name: String, span: Span },

    #[error("Unexpected token after expression: {got}")]
    TrailingInput { got: String, span: Span },

    #[error("Nesting too deep: more than {limit} levels")]
    NestingTooDeep { limit: usize, span: Span },

    // ==================== Runtime Errors ====================

    #[error("Duplicate declaration: {name}")]
    DuplicateDeclaration { name: String, span: Span },

    #[error("Unknown variable: {name}")]
    UnknownVariable { name: String, span: Span },

    #[error("Unknown function: {name}")]
    UnknownFunction { name: String, span: Span },

    #[error("Function '{name}' expects {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: Arity,
        got: usize,
        span: Span,
    },

    #[error("Division by zero")]
    DivisionByZero { span: Span },

    #[error("Function '{name}' finished without 'tank yu'")]
    MissingReturn { name: String, span: Span },

    #[error("'tank yu' is only allowed inside a function body")]
    ReturnOutsideFunction { span: Span },

    #[error("Unsupported feature: {feature}")]
    UnsupportedFeature { feature: String, span: Span },

    #[error("Cannot assign to constant '{name}'")]
    ConstantReassignment { name: String, span: Span },

    #[error("Arithmetic overflow in {operation}")]
    ArithmeticOverflow { operation: &'static str, span: Span },

    #[error("Power {base} beedo {exponent} is undefined")]
    UndefinedPower {
        base: String,
        exponent: String,
        span: Span,
    },

    #[error("Call depth limit of {limit} reached in '{name}'")]
    RecursionLimit {
        name: String,
        limit: usize,
        span: Span,
    },

    // ==================== Environment Errors ====================

    #[error("No input available")]
    InputExhausted,

    #[error("Invalid number format: '{input}'")]
    InvalidInput { input: String },

    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    /// Get the span associated with this error
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Lex { span, .. } => Some(*span),
            Self::UnexpectedToken { span, .. } => Some(*span),
            Self::UnexpectedEof { span, .. } => Some(*span),
            Self::InvalidNumber { span, .. } => Some(*span),
            Self::UnsupportedType { span, .. } => Some(*span),
            Self::TrailingInput { span, .. } => Some(*span),
            Self::NestingTooDeep { span, .. } => Some(*span),
            Self::DuplicateDeclaration { span, .. } => Some(*span),
            Self::UnknownVariable { span, .. } => Some(*span),
            Self::UnknownFunction { span, .. } => Some(*span),
            Self::ArityMismatch { span, .. } => Some(*span),
            Self::DivisionByZero { span } => Some(*span),
            Self::MissingReturn { span, .. } => Some(*span),
            Self::ReturnOutsideFunction { span } => Some(*span),
            Self::UnsupportedFeature { span, .. } => Some(*span),
            Self::ConstantReassignment { span, .. } => Some(*span),
            Self::ArithmeticOverflow { span, .. } => Some(*span),
            Self::UndefinedPower { span, .. } => Some(*span),
            Self::RecursionLimit { span, .. } => Some(*span),
            Self::InputExhausted | Self::InvalidInput { .. } | Self::Io(_) => None,
        }
    }

    /// Stable diagnostic code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Lex { .. } => "E0001",
            Self::UnexpectedToken { .. } => "E0101",
            Self::UnexpectedEof { .. } => "E0102",
            Self::InvalidNumber { .. } => "E0103",
            Self::UnsupportedType { .. } => "E0104",
            Self::TrailingInput { .. } => "E0105",
            Self::NestingTooDeep { .. } => "E0106",
            Self::DuplicateDeclaration { .. } => "E0201",
            Self::UnknownVariable { .. } => "E0202",
            Self::UnknownFunction { .. } => "E0203",
            Self::ArityMismatch { .. } => "E0204",
            Self::DivisionByZero { .. } => "E0205",
            Self::MissingReturn { .. } => "E0206",
            Self::ReturnOutsideFunction { .. } => "E0207",
            Self::UnsupportedFeature { .. } => "E0208",
            Self::ConstantReassignment { .. } => "E0209",
            Self::ArithmeticOverflow { .. } => "E0210",
            Self::UndefinedPower { .. } => "E0211",
            Self::RecursionLimit { .. } => "E0212",
            Self::InputExhausted => "E0301",
            Self::InvalidInput { .. } => "E0302",
            Self::Io(_) => "E0303",
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            Self::Lex { .. } => Phase::Lex,
            Self::UnexpectedToken { .. }
            | Self::UnexpectedEof { .. }
            | Self::InvalidNumber { .. }
            | Self::UnsupportedType { .. }
            | Self::TrailingInput { .. }
            | Self::NestingTooDeep { .. } => Phase::Syntax,
            Self::InputExhausted | Self::InvalidInput { .. } | Self::Io(_) => Phase::Environment,
            _ => Phase::Runtime,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_accepts() {
        assert!(Arity::Exactly(2).accepts(2));
        assert!(!Arity::Exactly(2).accepts(3));
        assert!(Arity::AtLeast(1).accepts(4));
        assert!(!Arity::AtLeast(1).accepts(0));
    }

    #[test]
    fn test_messages() {
        let err = Error::ArityMismatch {
            name: "miniboss".to_string(),
            expected: Arity::AtLeast(1),
            got: 0,
            span: Span::dummy(),
        };
        assert_eq!(
            err.to_string(),
            "Function 'miniboss' expects at least 1 argument(s), got 0"
        );
        assert_eq!(err.phase(), Phase::Runtime);
        assert_eq!(Error::InputExhausted.span(), None);
    }
}
