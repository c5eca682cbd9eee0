//! Frontend module - Lexer, Token Stream, Parser, Lexical Statistics

pub mod token;
pub mod lexer;
pub mod stream;
pub mod ast;
pub mod parser;
pub mod stats;
