//! Two-token lookahead over a scanned token sequence

use crate::frontend::lexer::Lexer;
use crate::frontend::token::{Token, TokenKind};

/// Cursor over tokens that skips whitespace and comments
pub struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenStream {
    /// Wrap pre-scanned tokens. An `EndOfFile` token is appended at
    /// `eof_offset` if the sequence does not already end with one.
    pub fn new(mut tokens: Vec<Token>, eof_offset: usize) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::EndOfFile) {
            tokens.push(Token::eof(eof_offset));
        }
        Self { tokens, pos: 0 }
    }

    pub fn from_source(source: &str) -> Self {
        let tokens = Lexer::new(source).tokenize();
        let eof_offset = tokens.last().map_or(0, |t| t.span.end);
        Self::new(tokens, eof_offset)
    }

    fn skip_trivia(&mut self) {
        while self.pos + 1 < self.tokens.len() && self.tokens[self.pos].is_trivia() {
            self.pos += 1;
        }
    }

    /// Current significant token; `EndOfFile` once the input is consumed
    pub fn peek(&mut self) -> &Token {
        self.skip_trivia();
        &self.tokens[self.pos]
    }

    /// The significant token after the current one
    pub fn peek_second(&mut self) -> &Token {
        self.skip_trivia();
        let last = self.tokens.len() - 1;
        let mut i = (self.pos + 1).min(last);
        while i < last && self.tokens[i].is_trivia() {
            i += 1;
        }
        &self.tokens[i]
    }

    /// Consume and return the current significant token.
    /// Stays on `EndOfFile` once it is reached.
    pub fn advance(&mut self) -> Token {
        self.skip_trivia();
        let token = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Span end of the most recently consumed significant token
    pub fn previous_end(&self) -> usize {
        self.tokens[..self.pos]
            .iter()
            .rev()
            .find(|t| !t.is_trivia())
            .map_or(0, |t| t.span.end)
    }

    pub fn is_at_end(&mut self) -> bool {
        self.peek().kind == TokenKind::EndOfFile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Span;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_skips_trivia() {
        let mut stream = TokenStream::from_source("  // hi\n x /* c */ y");
        assert_eq!(stream.advance().lexeme, "x");
        assert_eq!(stream.peek().lexeme, "y");
        assert_eq!(stream.advance().lexeme, "y");
        assert!(stream.is_at_end());
    }

    #[test]
    fn test_advance_saturates_at_eof() {
        let mut stream = TokenStream::from_source("x");
        stream.advance();
        for _ in 0..3 {
            let token = stream.advance();
            assert_eq!(token.kind, TokenKind::EndOfFile);
            assert_eq!(token.span, Span::point(1));
        }
    }

    #[test]
    fn test_synthesizes_eof() {
        let tokens = vec![Token::new(TokenKind::Identifier, "a", Span::new(0, 1))];
        let mut stream = TokenStream::new(tokens, 5);
        stream.advance();
        assert_eq!(stream.peek().kind, TokenKind::EndOfFile);
        assert_eq!(stream.peek().span.start, 5);
        assert_eq!(stream.previous_end(), 1);
    }

    #[test]
    fn test_peek_second_skips_trivia() {
        let mut stream = TokenStream::from_source("x /* c */ lumai");
        assert_eq!(stream.peek_second().lexeme, "lumai");
        assert_eq!(stream.peek().lexeme, "x");
        stream.advance();
        assert_eq!(stream.peek_second().kind, TokenKind::EndOfFile);
        stream.advance();
        assert_eq!(stream.peek_second().kind, TokenKind::EndOfFile);
    }
}
