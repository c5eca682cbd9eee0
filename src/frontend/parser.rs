//! Parser for Minion
//!
//! Recursive descent over a [`TokenStream`], one level per precedence tier
//! for expressions. Parsing stops at the first error.

use log::debug;
use rust_decimal::Decimal;

use crate::frontend::ast::*;
use crate::frontend::stream::TokenStream;
use crate::frontend::token::{Keyword, OperatorWord, Token, TokenKind};
use crate::utils::{Error, Result, Span};

/// The only numeric type name accepted as a type-tag
const TYPE_TAG: &str = "Papaya";

/// Deepest nesting of blocks, parentheses, prefix operators and operator
/// chains accepted in one program
pub const MAX_NESTING: usize = 100;

/// The parser
pub struct Parser {
    stream: TokenStream,
    /// Current nesting level, bounded by `MAX_NESTING`
    depth: usize,
}

impl Parser {
    /// Create a parser over the tokens of `source`
    pub fn new(source: &str) -> Self {
        Self::from_stream(TokenStream::from_source(source))
    }

    /// Create a parser from an existing token stream
    pub fn from_stream(stream: TokenStream) -> Self {
        Self { stream, depth: 0 }
    }

    // ==================== Helper Methods ====================

    fn current(&mut self) -> &Token {
        self.stream.peek()
    }

    fn current_span(&mut self) -> Span {
        self.stream.peek().span
    }

    fn advance(&mut self) -> Token {
        self.stream.advance()
    }

    /// Span from `start` to the end of the last consumed token
    fn span_from(&self, start: Span) -> Span {
        Span::new(start.start, self.stream.previous_end().max(start.end))
    }

    fn check_keyword(&mut self, keyword: Keyword) -> bool {
        self.current().is_keyword(keyword)
    }

    fn check_operator(&mut self, op: OperatorWord) -> bool {
        self.current().is_operator(op)
    }

    fn check_delimiter(&mut self, text: &str) -> bool {
        self.current().is_delimiter(text)
    }

    fn consume_operator(&mut self, op: OperatorWord) -> bool {
        if self.check_operator(op) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume_delimiter(&mut self, text: &str) -> bool {
        if self.check_delimiter(text) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Error for the current token not matching `expected`
    fn unexpected(&mut self, expected: impl Into<String>) -> Error {
        let token = self.current().clone();
        let expected = expected.into();
        match token.kind {
            TokenKind::EndOfFile => Error::UnexpectedEof {
                expected,
                span: token.span,
            },
            TokenKind::Error => Error::Lex {
                lexeme: token.lexeme,
                span: token.span,
            },
            _ => Error::UnexpectedToken {
                expected,
                got: token.describe(),
                span: token.span,
            },
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<Token> {
        if self.check_keyword(keyword) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(format!("'{}'", keyword.as_str())))
        }
    }

    fn expect_operator(&mut self, op: OperatorWord) -> Result<Token> {
        if self.check_operator(op) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(format!("'{}'", op.as_str())))
        }
    }

    fn expect_delimiter(&mut self, text: &str) -> Result<Token> {
        if self.check_delimiter(text) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(format!("'{}'", text)))
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<Ident> {
        if self.current().kind == TokenKind::Identifier {
            let token = self.advance();
            Ok(Ident::new(token.lexeme, token.span))
        } else {
            Err(self.unexpected(what))
        }
    }

    /// Only `Papaya` is a valid type-tag; any other identifier names an unsupported type
    fn expect_type_tag(&mut self) -> Result<()> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Identifier if token.lexeme == TYPE_TAG => {
                self.advance();
                Ok(())
            }
            TokenKind::Identifier => Err(Error::UnsupportedType {
                name: token.lexeme,
                span: token.span,
            }),
            _ => Err(self.unexpected(format!("type '{}'", TYPE_TAG))),
        }
    }

    fn expect_stmt_end(&mut self) -> Result<()> {
        self.expect_keyword(Keyword::Naidu).map(|_| ())
    }

    /// Go one nesting level deeper
    fn descend(&mut self) -> Result<()> {
        if self.depth >= MAX_NESTING {
            return Err(Error::NestingTooDeep {
                limit: MAX_NESTING,
                span: self.current_span(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    /// Run `f` one nesting level deeper
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let depth = self.depth;
        self.descend()?;
        let result = f(self);
        self.depth = depth;
        result
    }

    // ==================== Parsing Methods ====================

    /// Parse a complete program
    pub fn parse_program(&mut self) -> Result<Program> {
        self.expect_keyword(Keyword::Bello)?;

        let mut items = Vec::new();
        while !self.stream.is_at_end() {
            items.push(self.parse_item()?);
        }

        debug!("parsed program with {} top-level items", items.len());
        Ok(Program { items })
    }

    /// Parse a single expression that must span the whole input
    pub fn parse_standalone_expression(&mut self) -> Result<Expr> {
        let expr = self.parse_expression()?;
        let token = self.current().clone();
        if token.kind != TokenKind::EndOfFile {
            return Err(Error::TrailingInput {
                got: token.describe(),
                span: token.span,
            });
        }
        Ok(expr)
    }

    /// Parse a top-level item
    fn parse_item(&mut self) -> Result<Item> {
        if self.check_keyword(Keyword::Trusela) {
            Ok(Item::Const(self.parse_const()?))
        } else if self.check_keyword(Keyword::Boss) {
            Ok(Item::Function(self.parse_function()?))
        } else {
            Ok(Item::Stmt(self.parse_statement()?))
        }
    }

    /// trusela name Papaya (number | belloPi | belloE) naidu!
    fn parse_const(&mut self) -> Result<ConstDecl> {
        let start = self.advance().span;
        let name = self.expect_ident("constant name")?;
        self.expect_type_tag()?;

        let token = self.current().clone();
        let value = match token.kind {
            TokenKind::NumberLiteral => {
                self.advance();
                ConstValue::Number(parse_number(&token)?)
            }
            TokenKind::Identifier => match NamedConstant::from_name(&token.lexeme) {
                Some(constant) => {
                    self.advance();
                    ConstValue::Named(constant)
                }
                None => return Err(self.unexpected("number or named constant")),
            },
            _ => return Err(self.unexpected("number or named constant")),
        };

        self.expect_stmt_end()?;
        Ok(ConstDecl {
            name,
            value,
            span: self.span_from(start),
        })
    }

    /// boss name Papaya ( [param {, param}] ) block
    fn parse_function(&mut self) -> Result<FunctionDef> {
        let start = self.advance().span;
        let name = self.expect_ident("function name")?;
        self.expect_type_tag()?;
        self.expect_delimiter("(")?;

        let mut params = Vec::new();
        if !self.check_delimiter(")") {
            params.push(self.expect_ident("parameter name")?);
            while self.consume_delimiter(",") {
                params.push(self.expect_ident("parameter name")?);
            }
        }

        self.expect_delimiter(")")?;
        let body = self.parse_block()?;

        Ok(FunctionDef {
            name,
            params,
            body,
            span: self.span_from(start),
        })
    }

    /// oca! { statement } stopa
    fn parse_block(&mut self) -> Result<Block> {
        self.nested(Self::parse_block_body)
    }

    fn parse_block_body(&mut self) -> Result<Block> {
        let start = self.expect_keyword(Keyword::Oca)?.span;

        let mut stmts = Vec::new();
        while !self.check_keyword(Keyword::Stopa) {
            if self.stream.is_at_end() {
                return Err(self.unexpected("'stopa' to close the block"));
            }
            stmts.push(self.parse_statement()?);
        }
        self.advance(); // stopa

        Ok(Block {
            stmts,
            span: self.span_from(start),
        })
    }

    /// Parse a statement
    fn parse_statement(&mut self) -> Result<Stmt> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Keyword(Keyword::Poop) => self.parse_var_decl(),
            TokenKind::Keyword(Keyword::Guoleila) => self.parse_input(),
            TokenKind::Keyword(Keyword::Tulalilloo) => self.parse_output(),
            TokenKind::Keyword(Keyword::BiDo) => self.parse_if(),
            TokenKind::Keyword(Keyword::Kemari) => self.parse_while(),
            TokenKind::Keyword(Keyword::Again) => self.parse_for(),
            TokenKind::Keyword(Keyword::Tank) => self.parse_return(),
            TokenKind::Keyword(Keyword::Oca) => Ok(Stmt::Block(self.parse_block()?)),
            TokenKind::EndOfFile => Err(self.unexpected("statement")),
            _ => self.parse_assign_or_expr(),
        }
    }

    /// poop name Papaya naidu!
    fn parse_var_decl(&mut self) -> Result<Stmt> {
        let start = self.advance().span;
        let name = self.expect_ident("variable name")?;
        self.expect_type_tag()?;
        self.expect_stmt_end()?;
        Ok(Stmt::VarDecl {
            name,
            span: self.span_from(start),
        })
    }

    /// `name lumai expr naidu!` or `expr naidu!`
    ///
    /// Only a bare identifier directly followed by `lumai` is an assignment.
    fn parse_assign_or_expr(&mut self) -> Result<Stmt> {
        let start = self.current_span();

        if self.current().kind == TokenKind::Identifier
            && self.stream.peek_second().is_operator(OperatorWord::Lumai)
        {
            let target = self.expect_ident("variable name")?;
            self.advance(); // lumai
            let value = self.parse_expression()?;
            self.expect_stmt_end()?;
            return Ok(Stmt::Assign {
                target,
                value,
                span: self.span_from(start),
            });
        }

        let expr = self.parse_expression()?;
        self.expect_stmt_end()?;
        Ok(Stmt::Expr {
            expr,
            span: self.span_from(start),
        })
    }

    /// guoleila ( name ) naidu!
    fn parse_input(&mut self) -> Result<Stmt> {
        let start = self.advance().span;
        self.expect_delimiter("(")?;
        let target = self.expect_ident("variable name")?;
        self.expect_delimiter(")")?;
        self.expect_stmt_end()?;
        Ok(Stmt::Input {
            target,
            span: self.span_from(start),
        })
    }

    /// tulalilloo ti amo ( expr ) naidu!
    fn parse_output(&mut self) -> Result<Stmt> {
        let start = self.advance().span;
        self.expect_keyword(Keyword::Ti)?;
        self.expect_keyword(Keyword::Amo)?;
        self.expect_delimiter("(")?;
        let value = self.parse_expression()?;
        self.expect_delimiter(")")?;
        self.expect_stmt_end()?;
        Ok(Stmt::Output {
            value,
            span: self.span_from(start),
        })
    }

    fn parse_condition(&mut self) -> Result<Expr> {
        self.expect_delimiter("(")?;
        let condition = self.parse_expression()?;
        self.expect_delimiter(")")?;
        Ok(condition)
    }

    /// bi-do ( cond ) block [ uh-oh block ]
    fn parse_if(&mut self) -> Result<Stmt> {
        let start = self.advance().span;
        let condition = self.parse_condition()?;
        let then_block = self.parse_block()?;

        let else_block = if self.check_keyword(Keyword::UhOh) {
            self.advance();
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_block,
            else_block,
            span: self.span_from(start),
        })
    }

    /// kemari ( cond ) block
    fn parse_while(&mut self) -> Result<Stmt> {
        let start = self.advance().span;
        let condition = self.parse_condition()?;
        let body = self.parse_block()?;
        Ok(Stmt::While {
            condition,
            body,
            span: self.span_from(start),
        })
    }

    /// again ( var = start to end ) block
    fn parse_for(&mut self) -> Result<Stmt> {
        let start_span = self.advance().span;
        self.expect_delimiter("(")?;
        let var = self.expect_ident("loop variable")?;
        self.expect_delimiter("=")?;
        let start = self.parse_expression()?;

        if !self.current().is_identifier("to") {
            return Err(self.unexpected("'to'"));
        }
        self.advance();

        let end = self.parse_expression()?;
        self.expect_delimiter(")")?;
        let body = self.parse_block()?;

        Ok(Stmt::For {
            var,
            start,
            end,
            body,
            span: self.span_from(start_span),
        })
    }

    /// tank yu expr naidu!
    fn parse_return(&mut self) -> Result<Stmt> {
        let start = self.advance().span;
        self.expect_keyword(Keyword::Yu)?;
        let value = self.parse_expression()?;
        self.expect_stmt_end()?;
        Ok(Stmt::Return {
            value,
            span: self.span_from(start),
        })
    }

    // ==================== Expressions ====================

    /// Parse an expression
    pub fn parse_expression(&mut self) -> Result<Expr> {
        self.nested(Self::parse_or)
    }

    fn binary(left: Expr, op: BinOp, right: Expr) -> Expr {
        let span = left.span().merge(&right.span());
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
            span,
        }
    }

    fn unary(&self, op: UnOp, start: Span, operand: Expr) -> Expr {
        Expr::Unary {
            op,
            span: start.merge(&operand.span()),
            operand: Box::new(operand),
        }
    }

    /// and-expr { bo-ca and-expr }
    fn parse_or(&mut self) -> Result<Expr> {
        let depth = self.depth;
        let mut left = self.parse_and()?;
        while self.consume_operator(OperatorWord::BoCa) {
            self.descend()?;
            let right = self.parse_and()?;
            left = Self::binary(left, BinOp::Or, right);
        }
        self.depth = depth;
        Ok(left)
    }

    /// not-expr { tropa not-expr }
    fn parse_and(&mut self) -> Result<Expr> {
        let depth = self.depth;
        let mut left = self.parse_not()?;
        while self.consume_operator(OperatorWord::Tropa) {
            self.descend()?;
            let right = self.parse_not()?;
            left = Self::binary(left, BinOp::And, right);
        }
        self.depth = depth;
        Ok(left)
    }

    /// makoroni not-expr | equality
    fn parse_not(&mut self) -> Result<Expr> {
        if self.check_operator(OperatorWord::Makoroni) {
            let start = self.advance().span;
            let operand = self.nested(Self::parse_not)?;
            return Ok(self.unary(UnOp::Not, start, operand));
        }
        self.parse_equality()
    }

    /// relational { (con | nocon) relational }
    fn parse_equality(&mut self) -> Result<Expr> {
        let depth = self.depth;
        let mut left = self.parse_relational()?;
        loop {
            let op = if self.consume_operator(OperatorWord::Con) {
                BinOp::Eq
            } else if self.consume_operator(OperatorWord::Nocon) {
                BinOp::Ne
            } else {
                break;
            };
            self.descend()?;
            let right = self.parse_relational()?;
            left = Self::binary(left, op, right);
        }
        self.depth = depth;
        Ok(left)
    }

    /// additive { (la [con] | lacon | looka too [con]) additive }
    fn parse_relational(&mut self) -> Result<Expr> {
        let depth = self.depth;
        let mut left = self.parse_additive()?;
        loop {
            let op = if self.consume_operator(OperatorWord::Lacon) {
                BinOp::Le
            } else if self.consume_operator(OperatorWord::La) {
                if self.consume_operator(OperatorWord::Con) {
                    BinOp::Le
                } else {
                    BinOp::Lt
                }
            } else if self.consume_operator(OperatorWord::Looka) {
                self.expect_operator(OperatorWord::Too)?;
                if self.consume_operator(OperatorWord::Con) {
                    BinOp::Ge
                } else {
                    BinOp::Gt
                }
            } else {
                break;
            };
            self.descend()?;
            let right = self.parse_additive()?;
            left = Self::binary(left, op, right);
        }
        self.depth = depth;
        Ok(left)
    }

    /// multiplicative { (melomo | flavuk) multiplicative }
    fn parse_additive(&mut self) -> Result<Expr> {
        let depth = self.depth;
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = if self.consume_operator(OperatorWord::Melomo) {
                BinOp::Add
            } else if self.consume_operator(OperatorWord::Flavuk) {
                BinOp::Sub
            } else {
                break;
            };
            self.descend()?;
            let right = self.parse_multiplicative()?;
            left = Self::binary(left, op, right);
        }
        self.depth = depth;
        Ok(left)
    }

    /// unary { (dibotada | poopaye | pado) unary }
    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let depth = self.depth;
        let mut left = self.parse_unary()?;
        loop {
            let op = if self.consume_operator(OperatorWord::Dibotada) {
                BinOp::Mul
            } else if self.consume_operator(OperatorWord::Poopaye) {
                BinOp::Div
            } else if self.consume_operator(OperatorWord::Pado) {
                BinOp::Mod
            } else {
                break;
            };
            self.descend()?;
            let right = self.parse_unary()?;
            left = Self::binary(left, op, right);
        }
        self.depth = depth;
        Ok(left)
    }

    /// (melomo | flavuk) unary | power
    fn parse_unary(&mut self) -> Result<Expr> {
        let op = if self.check_operator(OperatorWord::Melomo) {
            UnOp::Plus
        } else if self.check_operator(OperatorWord::Flavuk) {
            UnOp::Neg
        } else {
            return self.parse_power();
        };
        let start = self.advance().span;
        let operand = self.nested(Self::parse_unary)?;
        Ok(self.unary(op, start, operand))
    }

    /// primary [ beedo power ], right-associative
    fn parse_power(&mut self) -> Result<Expr> {
        let base = self.parse_primary()?;
        if self.consume_operator(OperatorWord::Beedo) {
            let exponent = self.nested(Self::parse_power)?;
            return Ok(Self::binary(base, BinOp::Pow, exponent));
        }
        Ok(base)
    }

    /// Parse a primary expression
    fn parse_primary(&mut self) -> Result<Expr> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::NumberLiteral => {
                self.advance();
                Ok(Expr::Number {
                    value: parse_number(&token)?,
                    span: token.span,
                })
            }
            TokenKind::Keyword(Keyword::Da) => {
                self.advance();
                Ok(Expr::Number {
                    value: Decimal::ONE,
                    span: token.span,
                })
            }
            TokenKind::Keyword(Keyword::No) => {
                self.advance();
                Ok(Expr::Number {
                    value: Decimal::ZERO,
                    span: token.span,
                })
            }
            TokenKind::StringLiteral => {
                self.advance();
                Ok(Expr::StringLiteral {
                    lexeme: token.lexeme,
                    span: token.span,
                })
            }
            TokenKind::Identifier => {
                self.advance();
                if let Some(constant) = NamedConstant::from_name(&token.lexeme) {
                    return Ok(Expr::Constant {
                        constant,
                        span: token.span,
                    });
                }
                let ident = Ident::new(token.lexeme, token.span);
                if self.check_delimiter("(") {
                    return self.parse_call(ident);
                }
                Ok(Expr::Ident(ident))
            }
            TokenKind::Delimiter if token.lexeme == "(" => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_delimiter(")")?;
                Ok(expr)
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// name ( [expr {, expr}] )
    fn parse_call(&mut self, func: Ident) -> Result<Expr> {
        self.advance(); // (

        let mut args = Vec::new();
        if !self.consume_delimiter(")") {
            args.push(self.parse_expression()?);
            loop {
                if self.consume_delimiter(",") {
                    args.push(self.parse_expression()?);
                } else if self.consume_delimiter(")") {
                    break;
                } else {
                    return Err(self.unexpected("',' or ')'"));
                }
            }
        }

        let span = self.span_from(func.span);
        Ok(Expr::Call { func, args, span })
    }
}

fn parse_number(token: &Token) -> Result<Decimal> {
    token.lexeme.parse::<Decimal>().map_err(|_| Error::InvalidNumber {
        lexeme: token.lexeme.clone(),
        span: token.span,
    })
}

/// Parse a whole program (`bello!` followed by items)
pub fn parse_program(source: &str) -> Result<Program> {
    Parser::new(source).parse_program()
}

/// Parse a single expression; anything after it is an error
pub fn parse_expression(source: &str) -> Result<Expr> {
    Parser::new(source).parse_standalone_expression()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn num(value: i64) -> Decimal {
        Decimal::from(value)
    }

    /// Render an expression as a fully parenthesized string
    fn show(expr: &Expr) -> String {
        match expr {
            Expr::Number { value, .. } => value.to_string(),
            Expr::Constant { constant, .. } => format!("{:?}", constant),
            Expr::Ident(ident) => ident.name.clone(),
            Expr::Unary { op, operand, .. } => format!("({:?} {})", op, show(operand)),
            Expr::Binary { left, op, right, .. } => {
                format!("({} {} {})", show(left), op, show(right))
            }
            Expr::Call { func, args, .. } => {
                let args: Vec<String> = args.iter().map(show).collect();
                format!("{}({})", func.name, args.join(", "))
            }
            Expr::StringLiteral { lexeme, .. } => lexeme.clone(),
        }
    }

    fn parse_show(source: &str) -> String {
        show(&parse_expression(source).unwrap())
    }

    #[test]
    fn test_precedence() {
        assert_eq!(parse_show("2 melomo 3 dibotada 4"), "(2 melomo (3 dibotada 4))");
        assert_eq!(parse_show("(2 melomo 3) dibotada 4"), "((2 melomo 3) dibotada 4)");
        assert_eq!(parse_show("10 melomo 5 flavuk 2"), "((10 melomo 5) flavuk 2)");
        assert_eq!(parse_show("2 dibotada 3 beedo 2"), "(2 dibotada (3 beedo 2))");
    }

    #[test]
    fn test_power_is_right_associative() {
        assert_eq!(parse_show("2 beedo 3 beedo 2"), "(2 beedo (3 beedo 2))");
    }

    #[test]
    fn test_unary_binds_looser_than_power() {
        assert_eq!(parse_show("flavuk 2 beedo 10"), "(Neg (2 beedo 10))");
        assert_eq!(parse_show("(flavuk 2) beedo 10"), "((Neg 2) beedo 10)");
        assert_eq!(parse_show("flavuk flavuk 5"), "(Neg (Neg 5))");
    }

    #[test]
    fn test_logical_levels() {
        assert_eq!(parse_show("da tropa no bo-ca da"), "((1 tropa 0) bo-ca 1)");
        assert_eq!(parse_show("makoroni a con b"), "(Not (a con b))");
        assert_eq!(parse_show("makoroni makoroni no"), "(Not (Not 0))");
    }

    #[test]
    fn test_relational_forms() {
        assert_eq!(parse_show("a la b"), "(a la b)");
        assert_eq!(parse_show("a la con b"), "(a lacon b)");
        assert_eq!(parse_show("a lacon b"), "(a lacon b)");
        assert_eq!(parse_show("a looka too b"), "(a looka too b)");
        assert_eq!(parse_show("a looka too con b"), "(a looka too con b)");
        assert_eq!(parse_show("a melomo 1 la b con c"), "(((a melomo 1) la b) con c)");
    }

    #[test]
    fn test_looka_requires_too() {
        let err = parse_expression("a looka b").unwrap_err();
        assert!(matches!(err, Error::UnexpectedToken { ref expected, .. } if expected == "'too'"));
    }

    #[test]
    fn test_primaries() {
        assert_eq!(parse_show("Da"), "1");
        assert_eq!(parse_show("no"), "0");
        assert_eq!(parse_show("belloPi"), "Pi");
        assert_eq!(parse_show("BELLOE"), "E");
        assert_eq!(parse_show("!Hello!"), "!Hello!");
        assert_eq!(parse_show("-3.5"), "-3.5");
    }

    #[test]
    fn test_calls() {
        assert_eq!(
            parse_show("miniboss(bigboss(1, 5), miniboss(10, 6))"),
            "miniboss(bigboss(1, 5), miniboss(10, 6))"
        );
        assert_eq!(parse_show("f()"), "f()");
        assert_eq!(parse_show("muak(flavuk 15)"), "muak((Neg 15))");
    }

    #[test]
    fn test_call_span_covers_arguments() {
        let expr = parse_expression("f(1, 2)").unwrap();
        assert_eq!(expr.span(), Span::new(0, 7));
    }

    #[test]
    fn test_expression_errors() {
        assert!(matches!(
            parse_expression("(2 melomo 3"),
            Err(Error::UnexpectedEof { .. })
        ));
        assert!(matches!(
            parse_expression("2 melomo"),
            Err(Error::UnexpectedEof { .. })
        ));
        assert!(matches!(
            parse_expression("()"),
            Err(Error::UnexpectedToken { .. })
        ));
        assert!(matches!(
            parse_expression("muak(,)"),
            Err(Error::UnexpectedToken { .. })
        ));
        assert!(matches!(
            parse_expression("1 2"),
            Err(Error::TrailingInput { .. })
        ));
        assert!(matches!(
            parse_expression("123abc melomo 1"),
            Err(Error::Lex { .. })
        ));
    }

    #[test]
    fn test_minimal_program() {
        let program = parse_program("bello!\ntulalilloo ti amo (1) naidu!").unwrap();
        assert_eq!(program.items.len(), 1);
        assert!(matches!(
            &program.items[0],
            Item::Stmt(Stmt::Output { value: Expr::Number { .. }, .. })
        ));
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(parse_program("bello!").unwrap(), Program { items: vec![] });
    }

    #[test]
    fn test_missing_program_start() {
        let err = parse_program("poop x Papaya naidu!").unwrap_err();
        assert_eq!(
            err,
            Error::UnexpectedToken {
                expected: "'bello!'".to_string(),
                got: "'poop' (keyword)".to_string(),
                span: Span::new(0, 4),
            }
        );
    }

    #[test]
    fn test_declarations() {
        let program = parse_program(
            "bello!\ntrusela pi Papaya 3.14 naidu!\ntrusela e Papaya belloE naidu!\npoop x Papaya naidu!",
        )
        .unwrap();
        assert_eq!(program.items.len(), 3);
        match &program.items[0] {
            Item::Const(decl) => {
                assert_eq!(decl.name.name, "pi");
                assert_eq!(decl.value, ConstValue::Number(Decimal::new(314, 2)));
            }
            other => panic!("expected constant, got {:?}", other),
        }
        match &program.items[1] {
            Item::Const(decl) => assert_eq!(decl.value, ConstValue::Named(NamedConstant::E)),
            other => panic!("expected constant, got {:?}", other),
        }
        assert!(matches!(&program.items[2], Item::Stmt(Stmt::VarDecl { name, .. }) if name.name == "x"));
    }

    #[test]
    fn test_unsupported_type() {
        let err = parse_program("bello!\npoop name Banana naidu!").unwrap_err();
        assert!(matches!(err, Error::UnsupportedType { ref name, .. } if name == "Banana"));
    }

    #[test]
    fn test_function_definition() {
        let program = parse_program(
            "bello!\nboss add Papaya (a, b) oca!\n  tank yu a melomo b naidu!\nstopa",
        )
        .unwrap();
        match &program.items[0] {
            Item::Function(func) => {
                assert_eq!(func.name.name, "add");
                let params: Vec<&str> = func.params.iter().map(|p| p.name.as_str()).collect();
                assert_eq!(params, vec!["a", "b"]);
                assert_eq!(func.body.stmts.len(), 1);
                assert!(matches!(func.body.stmts[0], Stmt::Return { .. }));
            }
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_parameter_list() {
        let err = parse_program("bello!\nboss f Papaya (a, , b) oca! tank yu a naidu! stopa")
            .unwrap_err();
        assert!(matches!(err, Error::UnexpectedToken { ref expected, .. } if expected == "parameter name"));
    }

    #[test]
    fn test_assignment_and_expression_statements() {
        let program = parse_program("bello!\nx lumai 5 naidu!\nf(x) naidu!").unwrap();
        assert!(matches!(&program.items[0], Item::Stmt(Stmt::Assign { target, .. }) if target.name == "x"));
        assert!(matches!(&program.items[1], Item::Stmt(Stmt::Expr { expr: Expr::Call { .. }, .. })));
    }

    #[test]
    fn test_assignment_needs_identifier_target() {
        let err = parse_program("bello!\n(x) melomo 1 lumai 5 naidu!").unwrap_err();
        assert!(matches!(err, Error::UnexpectedToken { ref expected, .. } if expected == "'naidu!'"));
    }

    #[test]
    fn test_parenthesized_name_is_not_an_assignment_target() {
        let source = "bello!\npoop x Papaya naidu!\n(x) lumai 5 naidu!";
        let err = parse_program(source).unwrap_err();
        assert!(matches!(err, Error::UnexpectedToken { ref expected, .. } if expected == "'naidu!'"));
    }

    #[test]
    fn test_assignment_target_across_comment() {
        let program = parse_program("bello!\nx /* note */ lumai 5 naidu!").unwrap();
        assert!(matches!(&program.items[0], Item::Stmt(Stmt::Assign { target, .. }) if target.name == "x"));
    }

    #[test]
    fn test_nesting_within_limit() {
        let depth = 40;
        let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        assert!(parse_expression(&source).is_ok());
    }

    #[test]
    fn test_deep_parentheses_are_rejected() {
        let depth = 1000;
        let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        let err = parse_expression(&source).unwrap_err();
        assert!(matches!(err, Error::NestingTooDeep { limit: MAX_NESTING, .. }));
    }

    #[test]
    fn test_deep_prefix_operators_are_rejected() {
        for op in ["flavuk ", "makoroni "] {
            let source = format!("{}1", op.repeat(1000));
            let err = parse_expression(&source).unwrap_err();
            assert!(matches!(err, Error::NestingTooDeep { .. }), "{}", op);
        }
        let power = format!("2{}", " beedo 2".repeat(1000));
        assert!(matches!(parse_expression(&power), Err(Error::NestingTooDeep { .. })));
    }

    #[test]
    fn test_long_operator_chain_is_rejected() {
        let chain = format!("1{}", " melomo 1".repeat(1000));
        assert!(matches!(parse_expression(&chain), Err(Error::NestingTooDeep { .. })));
        let short = format!("1{}", " melomo 1".repeat(50));
        assert!(parse_expression(&short).is_ok());
    }

    #[test]
    fn test_deep_blocks_are_rejected() {
        let depth = 1000;
        let source = format!("bello!\n{}{}", "oca! ".repeat(depth), "stopa ".repeat(depth));
        let err = parse_program(&source).unwrap_err();
        assert!(matches!(err, Error::NestingTooDeep { .. }));
    }

    #[test]
    fn test_control_flow() {
        let source = "bello!
poop i Papaya naidu!
kemari (i la 10) oca!
    bi-do (i pado 2 con 0) oca!
        tulalilloo ti amo (i) naidu!
    stopa uh-oh oca!
        i lumai i naidu!
    stopa
    i lumai i melomo 1 naidu!
stopa
again (j = 1 to 3) oca! tulalilloo ti amo (j) naidu! stopa";
        let program = parse_program(source).unwrap();
        assert_eq!(program.items.len(), 3);
        match &program.items[1] {
            Item::Stmt(Stmt::While { body, .. }) => {
                assert_eq!(body.stmts.len(), 2);
                assert!(matches!(&body.stmts[0], Stmt::If { else_block: Some(_), .. }));
            }
            other => panic!("expected while, got {:?}", other),
        }
        match &program.items[2] {
            Item::Stmt(Stmt::For { var, start, end, .. }) => {
                assert_eq!(var.name, "j");
                assert_eq!(show(start), "1");
                assert_eq!(show(end), "3");
            }
            other => panic!("expected for, got {:?}", other),
        }
    }

    #[test]
    fn test_for_requires_to() {
        let err = parse_program("bello!\nagain (i = 1 till 3) oca! stopa").unwrap_err();
        assert!(matches!(err, Error::UnexpectedToken { ref expected, .. } if expected == "'to'"));
    }

    #[test]
    fn test_missing_statement_end() {
        let err = parse_program("bello!\npoop x Papaya\nx lumai 1 naidu!").unwrap_err();
        assert!(matches!(err, Error::UnexpectedToken { ref expected, .. } if expected == "'naidu!'"));
    }

    #[test]
    fn test_unclosed_block() {
        let err = parse_program("bello!\nbi-do (da) oca!\ntulalilloo ti amo (1) naidu!").unwrap_err();
        match err {
            Error::UnexpectedEof { expected, .. } => {
                assert_eq!(expected, "'stopa' to close the block");
            }
            other => panic!("expected end-of-input error, got {:?}", other),
        }
    }

    #[test]
    fn test_comments_are_ignored() {
        let program = parse_program(
            "bello! // start\n/* a\nblock */ tulalilloo ti amo (1) /* x */ naidu!",
        )
        .unwrap();
        assert_eq!(program.items.len(), 1);
    }

    #[test]
    fn test_number_literal_values() {
        assert_eq!(parse_show("1.128"), "1.128");
        let expr = parse_expression("42").unwrap();
        assert_eq!(expr, Expr::Number { value: num(42), span: Span::new(0, 2) });
    }

    #[test]
    fn test_number_out_of_range() {
        let err = parse_expression("99999999999999999999999999999999").unwrap_err();
        assert!(matches!(err, Error::InvalidNumber { .. }));
    }
}
