//! Lexer for Minion
//!
//! Converts source code into a finite list of tokens. Scanning never fails:
//! text that cannot form a valid token becomes an `Error` token and is left
//! for the parser to report.

use log::debug;

use crate::frontend::token::{Keyword, OperatorWord, Token, TokenKind};
use crate::utils::Span;

/// The lexer state
pub struct Lexer {
    /// Newline-normalized source as characters
    source: Vec<char>,
    /// Current position in source
    pos: usize,
    /// Start position of current token
    start: usize,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: &str) -> Self {
        let normalized = source.replace("\r\n", "\n").replace('\r', "\n");
        Self {
            source: normalized.chars().collect(),
            pos: 0,
            start: 0,
        }
    }

    /// Get the current character without advancing
    fn peek(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    /// Get the next character without advancing
    fn peek_next(&self) -> Option<char> {
        self.source.get(self.pos + 1).copied()
    }

    /// Advance to the next character
    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.advance();
        }
    }

    /// Check if we've reached the end of input
    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn is_comment_start(&self) -> bool {
        self.peek() == Some('/') && matches!(self.peek_next(), Some('/') | Some('*'))
    }

    fn lexeme(&self) -> String {
        self.source[self.start..self.pos].iter().collect()
    }

    /// Create a token spanning from `start` to the current position
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.lexeme(), Span::new(self.start, self.pos))
    }

    fn read_whitespace(&mut self) -> Token {
        self.advance_while(char::is_whitespace);
        self.make_token(TokenKind::Whitespace)
    }

    fn read_line_comment(&mut self) -> Token {
        self.advance_while(|c| c != '\n');
        self.make_token(TokenKind::Comment)
    }

    /// `/* ... */`, running to the end of input when unterminated
    fn read_block_comment(&mut self) -> Token {
        self.advance(); // skip /
        self.advance(); // skip *
        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_next() == Some('/') {
                self.advance();
                self.advance();
                break;
            }
            self.advance();
        }
        self.make_token(TokenKind::Comment)
    }

    /// Read a keyword, operator word or identifier
    fn read_word(&mut self) -> Token {
        self.advance_while(is_word_char);
        let word = self.lexeme();

        if self.peek() == Some('!') {
            if let Some(keyword) = Keyword::from_word(&format!("{}!", word)) {
                self.advance();
                return self.make_token(TokenKind::Keyword(keyword));
            }
        }

        let kind = if let Some(keyword) = Keyword::from_word(&word) {
            TokenKind::Keyword(keyword)
        } else if let Some(op) = OperatorWord::from_word(&word) {
            TokenKind::Operator(op)
        } else {
            TokenKind::Identifier
        };

        self.make_token(kind)
    }

    /// Read a number literal: `-?digits(.digits)?`
    fn read_number(&mut self) -> Token {
        if self.peek() == Some('-') {
            self.advance();
        }
        self.advance_while(|c| c.is_ascii_digit());

        // Check for decimal point
        if self.peek() == Some('.') && self.peek_next().map_or(false, |c| c.is_ascii_digit()) {
            self.advance(); // consume '.'
            self.advance_while(|c| c.is_ascii_digit());
        }

        // `123abc` is one malformed token, not a number and a name
        if self.peek().map_or(false, char::is_alphabetic) {
            self.advance_while(is_word_char);
            return self.make_token(TokenKind::Error);
        }

        self.make_token(TokenKind::NumberLiteral)
    }

    /// Read a `!...!` string. `!!` inside is an escaped bang.
    fn read_bang_string(&mut self) -> Token {
        self.advance(); // consume opening bang

        // `!)` is a lone bang string; the paren stays for the parser
        if self.peek() == Some(')') {
            return self.make_token(TokenKind::StringLiteral);
        }

        while let Some(c) = self.peek() {
            if c == '!' {
                if self.peek_next() == Some('!') {
                    self.advance();
                    self.advance();
                    continue;
                }
                self.advance(); // consume closing bang
                break;
            }
            self.advance();
        }

        self.make_token(TokenKind::StringLiteral)
    }

    /// Read a `"..."` string verbatim, quotes included
    fn read_quoted_string(&mut self) -> Token {
        self.advance(); // consume opening quote
        while let Some(c) = self.advance() {
            if c == '"' {
                break;
            }
        }
        self.make_token(TokenKind::StringLiteral)
    }

    fn read_delimiter(&mut self) -> Token {
        let first = self.advance();
        if matches!(first, Some('(') | Some(')')) {
            return self.make_token(TokenKind::Delimiter);
        }

        while let Some(c) = self.peek() {
            if c.is_alphanumeric()
                || c.is_whitespace()
                || c == '('
                || c == ')'
                || c == '_'
                || self.is_comment_start()
            {
                break;
            }
            self.advance();
        }

        self.make_token(TokenKind::Delimiter)
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Token {
        self.start = self.pos;

        let Some(c) = self.peek() else {
            return Token::eof(self.pos);
        };

        if c.is_whitespace() {
            return self.read_whitespace();
        }

        if c == '/' && self.peek_next() == Some('/') {
            return self.read_line_comment();
        }

        if c == '/' && self.peek_next() == Some('*') {
            return self.read_block_comment();
        }

        // Identifiers and keywords
        if c.is_alphabetic() || c == '_' {
            return self.read_word();
        }

        // Numbers
        if c.is_ascii_digit()
            || (c == '-' && self.peek_next().map_or(false, |n| n.is_ascii_digit()))
        {
            return self.read_number();
        }

        match c {
            '!' => self.read_bang_string(),
            '"' => self.read_quoted_string(),
            _ => self.read_delimiter(),
        }
    }

    /// Tokenize the entire source; the last token is always `EndOfFile`
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::EndOfFile;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        debug!("lexed {} tokens", tokens.len());
        tokens
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// Tokenize `source` from the start
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).tokenize()
}
