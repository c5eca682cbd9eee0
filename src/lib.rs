//! Minion
//!
//! Lexer, parser and tree-walking interpreter for Minion, a small teaching
//! language whose keywords are Minion slang. Every value is a decimal
//! number; programs talk to the outside world only through an
//! [`Environment`].

pub mod feedback;
pub mod frontend;
pub mod runtime;
pub mod stdlib;
pub mod utils;

pub use frontend::ast::{Expr, Program};
pub use frontend::lexer::tokenize;
pub use frontend::parser::{parse_expression, parse_program};
pub use frontend::token::{Token, TokenKind};
pub use runtime::{
    ConsoleEnvironment, ConsoleOptions, Environment, Evaluator, ScriptedEnvironment,
};
pub use utils::{Error, Result, Span};

/// Run a parsed program against `env`
pub fn run<E: Environment>(program: &Program, env: E) -> Result<()> {
    Evaluator::new(env).run(program)
}

/// Parses and runs source text against one environment
pub struct Interpreter<E> {
    evaluator: Evaluator<E>,
}

impl<E: Environment> Interpreter<E> {
    pub fn new(env: E) -> Self {
        Self {
            evaluator: Evaluator::new(env),
        }
    }

    /// Parse and run `source`. Nothing runs when parsing fails.
    pub fn execute(&mut self, source: &str) -> Result<()> {
        let program = parse_program(source)?;
        self.evaluator.run(&program)
    }

    pub fn environment(&self) -> &E {
        self.evaluator.environment()
    }

    pub fn into_environment(self) -> E {
        self.evaluator.into_environment()
    }
}
