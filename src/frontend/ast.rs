//! Abstract Syntax Tree definitions for Minion

use std::fmt;

use rust_decimal::Decimal;

use crate::utils::Span;

/// A complete program: everything after `bello!`
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub items: Vec<Item>,
}

/// Top-level items
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Const(ConstDecl),
    Function(FunctionDef),
    Stmt(Stmt),
}

/// `trusela name Papaya value naidu!`
#[derive(Debug, Clone, PartialEq)]
pub struct ConstDecl {
    pub name: Ident,
    pub value: ConstValue,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstValue {
    Number(Decimal),
    Named(NamedConstant),
}

/// `boss name Papaya (params) block`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub body: Block,
    pub span: Span,
}

/// `oca! ... stopa`
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// Statement
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// poop name Papaya naidu!
    VarDecl { name: Ident, span: Span },
    /// name lumai expr naidu!
    Assign { target: Ident, value: Expr, span: Span },
    /// guoleila (name) naidu!
    Input { target: Ident, span: Span },
    /// tulalilloo ti amo (expr) naidu!
    Output { value: Expr, span: Span },
    /// bi-do (cond) block [uh-oh block]
    If {
        condition: Expr,
        then_block: Block,
        else_block: Option<Block>,
        span: Span,
    },
    /// kemari (cond) block
    While {
        condition: Expr,
        body: Block,
        span: Span,
    },
    /// again (var = start to end) block
    For {
        var: Ident,
        start: Expr,
        end: Expr,
        body: Block,
        span: Span,
    },
    /// tank yu expr naidu!
    Return { value: Expr, span: Span },
    /// Nested block
    Block(Block),
    /// Expression statement
    Expr { expr: Expr, span: Span },
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::VarDecl { span, .. }
            | Stmt::Assign { span, .. }
            | Stmt::Input { span, .. }
            | Stmt::Output { span, .. }
            | Stmt::If { span, .. }
            | Stmt::While { span, .. }
            | Stmt::For { span, .. }
            | Stmt::Return { span, .. }
            | Stmt::Expr { span, .. } => *span,
            Stmt::Block(block) => block.span,
        }
    }
}

/// Expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Number literal, including `da`/`no`
    Number { value: Decimal, span: Span },
    /// `belloPi` / `belloE`
    Constant { constant: NamedConstant, span: Span },
    /// Identifier
    Ident(Ident),
    /// Unary operation
    Unary {
        op: UnOp,
        operand: Box<Expr>,
        span: Span,
    },
    /// Binary operation
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
        span: Span,
    },
    /// Function call
    Call {
        func: Ident,
        args: Vec<Expr>,
        span: Span,
    },
    /// String literal; parsed but never evaluable
    StringLiteral { lexeme: String, span: Span },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Number { span, .. } => *span,
            Expr::Constant { span, .. } => *span,
            Expr::Ident(ident) => ident.span,
            Expr::Unary { span, .. } => *span,
            Expr::Binary { span, .. } => *span,
            Expr::Call { span, .. } => *span,
            Expr::StringLiteral { span, .. } => *span,
        }
    }
}

/// Identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// Builtin numeric constants, resolved without scope lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedConstant {
    Pi,
    E,
}

impl NamedConstant {
    /// Case-insensitive match on `belloPi` / `belloE`
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("belloPi") {
            Some(NamedConstant::Pi)
        } else if name.eq_ignore_ascii_case("belloE") {
            Some(NamedConstant::E)
        } else {
            None
        }
    }

    pub fn value(&self) -> Decimal {
        match self {
            NamedConstant::Pi => Decimal::new(3_141_592_653_589_793, 15),
            NamedConstant::E => Decimal::new(2_718_281_828_459_045, 15),
        }
    }
}

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            BinOp::Add => "melomo",
            BinOp::Sub => "flavuk",
            BinOp::Mul => "dibotada",
            BinOp::Div => "poopaye",
            BinOp::Mod => "pado",
            BinOp::Pow => "beedo",
            BinOp::Eq => "con",
            BinOp::Ne => "nocon",
            BinOp::Lt => "la",
            BinOp::Le => "lacon",
            BinOp::Gt => "looka too",
            BinOp::Ge => "looka too con",
            BinOp::And => "tropa",
            BinOp::Or => "bo-ca",
        };
        f.write_str(word)
    }
}

/// Unary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    /// melomo
    Plus,
    /// flavuk
    Neg,
    /// makoroni
    Not,
}
