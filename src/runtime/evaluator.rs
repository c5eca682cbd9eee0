//! Tree-walking evaluator
//!
//! Statements return a [`Flow`] so that `tank yu` unwinds through nested
//! blocks as an ordinary value. Every scope pushed on the way is popped on
//! every exit path, errors included.

use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, trace, warn};
use rust_decimal::Decimal;

use crate::frontend::ast::*;
use crate::runtime::environment::Environment;
use crate::runtime::scope::{Binding, ScopeChain};
use crate::runtime::value::{apply_binary, from_bool, is_truthy};
use crate::stdlib::BuiltinRegistry;
use crate::utils::{Arity, Error, Result, Span};

/// Outcome of executing a statement
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flow {
    Normal,
    /// A `tank yu` is unwinding toward the enclosing call
    Return(Decimal),
}

/// Nested user-function calls allowed by default. Each level costs a few
/// kilobytes of native stack, so this fits a 2 MiB thread.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 128;

/// Executes programs against an [`Environment`]
pub struct Evaluator<E> {
    env: E,
    builtins: BuiltinRegistry,
    functions: HashMap<String, Rc<FunctionDef>>,
    /// User-function calls currently active
    call_depth: usize,
    max_call_depth: usize,
}

impl<E: Environment> Evaluator<E> {
    pub fn new(env: E) -> Self {
        Self {
            env,
            builtins: BuiltinRegistry::new(),
            functions: HashMap::new(),
            call_depth: 0,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    /// Set the call depth past which a call fails with `RecursionLimit`.
    /// Raise it only on a thread with a matching stack size.
    pub fn with_max_call_depth(mut self, limit: usize) -> Self {
        self.max_call_depth = limit;
        self
    }

    pub fn environment(&self) -> &E {
        &self.env
    }

    pub fn into_environment(self) -> E {
        self.env
    }

    /// Run a program in a fresh global scope
    pub fn run(&mut self, program: &Program) -> Result<()> {
        let mut scopes = ScopeChain::new();
        self.run_in(program, &mut scopes)
    }

    /// Run a program using `scopes` as its global scope chain.
    ///
    /// Constants and functions are registered before any statement runs.
    pub fn run_in(&mut self, program: &Program, scopes: &mut ScopeChain) -> Result<()> {
        self.functions.clear();
        self.register_declarations(program, scopes)?;

        for item in &program.items {
            if let Item::Stmt(stmt) = item {
                self.exec_stmt(stmt, scopes, false)?;
            }
        }
        Ok(())
    }

    fn register_declarations(&mut self, program: &Program, scopes: &mut ScopeChain) -> Result<()> {
        let mut constants = 0;
        for item in &program.items {
            match item {
                Item::Const(decl) => {
                    let value = match decl.value {
                        ConstValue::Number(value) => value,
                        ConstValue::Named(constant) => constant.value(),
                    };
                    let binding = Binding {
                        value,
                        mutable: false,
                    };
                    scopes.define(&decl.name.name, binding, decl.name.span)?;
                    constants += 1;
                }
                Item::Function(func) => {
                    let name = &func.name.name;
                    if self.functions.contains_key(name) {
                        return Err(Error::DuplicateDeclaration {
                            name: name.clone(),
                            span: func.name.span,
                        });
                    }
                    if self.builtins.is_builtin(name) {
                        warn!(
                            "function '{}' has the name of a built-in; calls will use the built-in",
                            name
                        );
                    }
                    self.functions.insert(name.clone(), Rc::new(func.clone()));
                }
                Item::Stmt(_) => {}
            }
        }
        debug!(
            "registered {} constants and {} functions",
            constants,
            self.functions.len()
        );
        Ok(())
    }

    /// Run `f` inside a fresh scope, popping it whatever the outcome
    fn scoped<T>(
        &mut self,
        scopes: &mut ScopeChain,
        f: impl FnOnce(&mut Self, &mut ScopeChain) -> Result<T>,
    ) -> Result<T> {
        scopes.push_scope();
        let result = f(self, scopes);
        scopes.pop_scope();
        result
    }

    fn exec_block(&mut self, block: &Block, scopes: &mut ScopeChain, in_function: bool) -> Result<Flow> {
        self.scoped(scopes, |ev, scopes| ev.exec_stmts(&block.stmts, scopes, in_function))
    }

    fn exec_stmts(&mut self, stmts: &[Stmt], scopes: &mut ScopeChain, in_function: bool) -> Result<Flow> {
        for stmt in stmts {
            if let Flow::Return(value) = self.exec_stmt(stmt, scopes, in_function)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    /// Execute a statement. `in_function` is true when the statement is
    /// lexically inside a function body.
    pub fn exec_stmt(&mut self, stmt: &Stmt, scopes: &mut ScopeChain, in_function: bool) -> Result<Flow> {
        match stmt {
            Stmt::VarDecl { name, .. } => {
                let binding = Binding {
                    value: Decimal::ZERO,
                    mutable: true,
                };
                scopes.define(&name.name, binding, name.span)?;
            }

            Stmt::Assign { target, value, .. } => {
                let value = self.evaluate(value, scopes)?;
                let binding = writable(scopes, target)?.ok_or_else(|| Error::UnknownVariable {
                    name: target.name.clone(),
                    span: target.span,
                })?;
                binding.value = value;
            }

            Stmt::Input { target, .. } => {
                // a constant target fails before any input is consumed
                let declared = writable(scopes, target)?.is_some();
                let value = self.env.read_number()?;
                if declared {
                    if let Some(binding) = scopes.lookup_mut(&target.name) {
                        binding.value = value;
                    }
                } else {
                    let binding = Binding {
                        value,
                        mutable: true,
                    };
                    scopes.define(&target.name, binding, target.span)?;
                }
            }

            Stmt::Output { value, .. } => {
                let value = self.evaluate(value, scopes)?;
                self.env.write_number(value)?;
            }

            Stmt::If {
                condition,
                then_block,
                else_block,
                ..
            } => {
                if is_truthy(self.evaluate(condition, scopes)?) {
                    return self.exec_block(then_block, scopes, in_function);
                } else if let Some(else_block) = else_block {
                    return self.exec_block(else_block, scopes, in_function);
                }
            }

            Stmt::While { condition, body, .. } => {
                while is_truthy(self.evaluate(condition, scopes)?) {
                    if let Flow::Return(value) = self.exec_block(body, scopes, in_function)? {
                        return Ok(Flow::Return(value));
                    }
                }
            }

            Stmt::For {
                var,
                start,
                end,
                body,
                span,
            } => {
                let start = self.evaluate(start, scopes)?;
                let end = self.evaluate(end, scopes)?;
                return self.exec_for(var, start, end, body, *span, scopes, in_function);
            }

            Stmt::Return { value, span } => {
                if !in_function {
                    return Err(Error::ReturnOutsideFunction { span: *span });
                }
                let value = self.evaluate(value, scopes)?;
                return Ok(Flow::Return(value));
            }

            Stmt::Block(block) => return self.exec_block(block, scopes, in_function),

            Stmt::Expr { expr, .. } => {
                self.evaluate(expr, scopes)?;
            }
        }
        Ok(Flow::Normal)
    }

    /// `again (var = start to end)`: inclusive bounds, step one, nothing
    /// runs when `start > end`. The loop variable is reset to the counter
    /// before every iteration.
    #[allow(clippy::too_many_arguments)]
    fn exec_for(
        &mut self,
        var: &Ident,
        start: Decimal,
        end: Decimal,
        body: &Block,
        span: Span,
        scopes: &mut ScopeChain,
        in_function: bool,
    ) -> Result<Flow> {
        trace!("for {} in {}..={}", var.name, start, end);
        self.scoped(scopes, |ev, scopes| {
            let binding = Binding {
                value: start,
                mutable: true,
            };
            scopes.define(&var.name, binding, var.span)?;

            let mut counter = start;
            while counter <= end {
                if let Some(binding) = scopes.lookup_mut(&var.name) {
                    binding.value = counter;
                }
                if let Flow::Return(value) = ev.exec_block(body, scopes, in_function)? {
                    return Ok(Flow::Return(value));
                }
                counter = counter.checked_add(Decimal::ONE).ok_or(Error::ArithmeticOverflow {
                    operation: "again",
                    span,
                })?;
            }
            Ok(Flow::Normal)
        })
    }

    /// Evaluate an expression in the given scope chain
    pub fn evaluate(&mut self, expr: &Expr, scopes: &mut ScopeChain) -> Result<Decimal> {
        match expr {
            Expr::Number { value, .. } => Ok(*value),

            Expr::Constant { constant, .. } => Ok(constant.value()),

            Expr::Ident(ident) => {
                if let Some(constant) = NamedConstant::from_name(&ident.name) {
                    return Ok(constant.value());
                }
                scopes
                    .lookup(&ident.name)
                    .map(|binding| binding.value)
                    .ok_or_else(|| Error::UnknownVariable {
                        name: ident.name.clone(),
                        span: ident.span,
                    })
            }

            Expr::Unary { op, operand, .. } => {
                let value = self.evaluate(operand, scopes)?;
                Ok(match op {
                    UnOp::Plus => value,
                    UnOp::Neg => -value,
                    UnOp::Not => from_bool(!is_truthy(value)),
                })
            }

            Expr::Binary {
                left,
                op,
                right,
                span,
            } => {
                // both operands always run; no short-circuit
                let left = self.evaluate(left, scopes)?;
                let right = self.evaluate(right, scopes)?;
                apply_binary(*op, left, right, *span)
            }

            Expr::Call { func, args, span } => self.call(func, args, *span, scopes),

            Expr::StringLiteral { span, .. } => Err(Error::UnsupportedFeature {
                feature: "string literal evaluation".to_string(),
                span: *span,
            }),
        }
    }

    fn call(&mut self, func: &Ident, args: &[Expr], span: Span, scopes: &mut ScopeChain) -> Result<Decimal> {
        // arguments run in the caller's scope, left to right
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.evaluate(arg, scopes)?);
        }

        if let Some(builtin) = self.builtins.get(&func.name) {
            return builtin.call(&values, span);
        }

        let def = self
            .functions
            .get(&func.name)
            .cloned()
            .ok_or_else(|| Error::UnknownFunction {
                name: func.name.clone(),
                span: func.span,
            })?;

        if def.params.len() != values.len() {
            return Err(Error::ArityMismatch {
                name: func.name.clone(),
                expected: Arity::Exactly(def.params.len()),
                got: values.len(),
                span,
            });
        }

        if self.call_depth >= self.max_call_depth {
            return Err(Error::RecursionLimit {
                name: func.name.clone(),
                limit: self.max_call_depth,
                span,
            });
        }

        trace!("call {}({} args)", func.name, values.len());
        self.call_depth += 1;
        scopes.push_frame();
        let result = self.call_body(&def, values, span, scopes);
        scopes.pop_frame();
        self.call_depth -= 1;
        result
    }

    fn call_body(
        &mut self,
        def: &FunctionDef,
        values: Vec<Decimal>,
        span: Span,
        scopes: &mut ScopeChain,
    ) -> Result<Decimal> {
        for (param, value) in def.params.iter().zip(values) {
            let binding = Binding {
                value,
                mutable: true,
            };
            scopes.define(&param.name, binding, param.span)?;
        }

        match self.exec_block(&def.body, scopes, true)? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Err(Error::MissingReturn {
                name: def.name.name.clone(),
                span,
            }),
        }
    }
}

/// Resolve an assignment target, refusing constants
fn writable<'a>(scopes: &'a mut ScopeChain, target: &Ident) -> Result<Option<&'a mut Binding>> {
    match scopes.lookup_mut(&target.name) {
        Some(binding) if !binding.mutable => Err(Error::ConstantReassignment {
            name: target.name.clone(),
            span: target.span,
        }),
        other => Ok(other),
    }
}
