//! Token definitions for Minion

use std::fmt;

use serde::Serialize;

use crate::utils::Span;

/// A token produced by the lexer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact source text the token was scanned from
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    pub fn eof(offset: usize) -> Self {
        Self {
            kind: TokenKind::EndOfFile,
            lexeme: String::new(),
            span: Span::point(offset),
        }
    }

    /// Whitespace and comments never reach the parser
    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::Comment)
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }

    pub fn is_operator(&self, op: OperatorWord) -> bool {
        self.kind == TokenKind::Operator(op)
    }

    pub fn is_delimiter(&self, text: &str) -> bool {
        self.kind == TokenKind::Delimiter && self.lexeme == text
    }

    pub fn is_identifier(&self, text: &str) -> bool {
        self.kind == TokenKind::Identifier && self.lexeme == text
    }

    /// Human-readable description used in diagnostics
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::EndOfFile => "end of input".to_string(),
            _ => format!("'{}' ({})", self.lexeme, self.kind),
        }
    }
}

/// Token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    Keyword(Keyword),
    Identifier,
    NumberLiteral,
    StringLiteral,
    Operator(OperatorWord),
    Delimiter,
    Comment,
    Whitespace,
    EndOfFile,
    /// Number immediately followed by letters, e.g. `123abc`
    Error,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(_) => f.write_str("keyword"),
            TokenKind::Identifier => f.write_str("identifier"),
            TokenKind::NumberLiteral => f.write_str("number literal"),
            TokenKind::StringLiteral => f.write_str("string literal"),
            TokenKind::Operator(_) => f.write_str("operator"),
            TokenKind::Delimiter => f.write_str("delimiter"),
            TokenKind::Comment => f.write_str("comment"),
            TokenKind::Whitespace => f.write_str("whitespace"),
            TokenKind::EndOfFile => f.write_str("end of input"),
            TokenKind::Error => f.write_str("error"),
        }
    }
}

/// Keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Keyword {
    /// bello! (program start)
    Bello,
    /// oca! (block start)
    Oca,
    /// stopa (block end)
    Stopa,
    /// naidu! (statement end)
    Naidu,
    /// trusela (constant declaration)
    Trusela,
    /// poop (variable declaration)
    Poop,
    /// boss (function definition)
    Boss,
    /// bi-do (if)
    BiDo,
    /// uh-oh (else)
    UhOh,
    /// kemari (while)
    Kemari,
    /// again (for)
    Again,
    /// guoleila (input)
    Guoleila,
    /// tulalilloo, first word of `tulalilloo ti amo` (output)
    Tulalilloo,
    /// ti
    Ti,
    /// amo
    Amo,
    /// tank, first word of `tank yu` (return)
    Tank,
    /// yu
    Yu,
    /// da / Da (true)
    Da,
    /// no / No (false)
    No,
    /// aspetta (reserved)
    Aspetta,
    /// bapple (reserved)
    Bapple,
    /// boo-ya (reserved)
    BooYa,
    /// loka (reserved)
    Loka,
}

impl Keyword {
    /// Look up a keyword. Forms ending in `!` only match with the bang.
    pub fn from_word(s: &str) -> Option<Keyword> {
        match s {
            "bello!" => Some(Keyword::Bello),
            "oca!" => Some(Keyword::Oca),
            "naidu!" => Some(Keyword::Naidu),
            "stopa" => Some(Keyword::Stopa),
            "trusela" => Some(Keyword::Trusela),
            "poop" => Some(Keyword::Poop),
            "boss" => Some(Keyword::Boss),
            "bi-do" => Some(Keyword::BiDo),
            "uh-oh" => Some(Keyword::UhOh),
            "kemari" => Some(Keyword::Kemari),
            "again" => Some(Keyword::Again),
            "guoleila" => Some(Keyword::Guoleila),
            "tulalilloo" => Some(Keyword::Tulalilloo),
            "ti" => Some(Keyword::Ti),
            "amo" => Some(Keyword::Amo),
            "tank" => Some(Keyword::Tank),
            "yu" => Some(Keyword::Yu),
            "da" | "Da" => Some(Keyword::Da),
            "no" | "No" => Some(Keyword::No),
            "aspetta" => Some(Keyword::Aspetta),
            "bapple" => Some(Keyword::Bapple),
            "boo-ya" => Some(Keyword::BooYa),
            "loka" => Some(Keyword::Loka),
            _ => None,
        }
    }

    /// Canonical spelling, used in "expected ..." messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Bello => "bello!",
            Keyword::Oca => "oca!",
            Keyword::Stopa => "stopa",
            Keyword::Naidu => "naidu!",
            Keyword::Trusela => "trusela",
            Keyword::Poop => "poop",
            Keyword::Boss => "boss",
            Keyword::BiDo => "bi-do",
            Keyword::UhOh => "uh-oh",
            Keyword::Kemari => "kemari",
            Keyword::Again => "again",
            Keyword::Guoleila => "guoleila",
            Keyword::Tulalilloo => "tulalilloo",
            Keyword::Ti => "ti",
            Keyword::Amo => "amo",
            Keyword::Tank => "tank",
            Keyword::Yu => "yu",
            Keyword::Da => "da",
            Keyword::No => "no",
            Keyword::Aspetta => "aspetta",
            Keyword::Bapple => "bapple",
            Keyword::BooYa => "boo-ya",
            Keyword::Loka => "loka",
        }
    }
}

/// Operator words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperatorWord {
    /// lumai (assignment)
    Lumai,
    /// melomo (+)
    Melomo,
    /// flavuk (-)
    Flavuk,
    /// dibotada (*)
    Dibotada,
    /// poopaye (/)
    Poopaye,
    /// pado (%)
    Pado,
    /// beedo (^)
    Beedo,
    /// con (==)
    Con,
    /// nocon (!=)
    Nocon,
    /// la (<)
    La,
    /// lacon (<=)
    Lacon,
    /// looka, first word of `looka too` (>)
    Looka,
    /// too
    Too,
    /// tropa (logical and)
    Tropa,
    /// bo-ca (logical or)
    BoCa,
    /// makoroni (logical not)
    Makoroni,
}

impl OperatorWord {
    pub fn from_word(s: &str) -> Option<OperatorWord> {
        match s {
            "lumai" => Some(OperatorWord::Lumai),
            "melomo" => Some(OperatorWord::Melomo),
            "flavuk" => Some(OperatorWord::Flavuk),
            "dibotada" => Some(OperatorWord::Dibotada),
            "poopaye" => Some(OperatorWord::Poopaye),
            "pado" => Some(OperatorWord::Pado),
            "beedo" => Some(OperatorWord::Beedo),
            "con" => Some(OperatorWord::Con),
            "nocon" => Some(OperatorWord::Nocon),
            "la" => Some(OperatorWord::La),
            "lacon" => Some(OperatorWord::Lacon),
            "looka" => Some(OperatorWord::Looka),
            "too" => Some(OperatorWord::Too),
            "tropa" => Some(OperatorWord::Tropa),
            "bo-ca" => Some(OperatorWord::BoCa),
            "makoroni" => Some(OperatorWord::Makoroni),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorWord::Lumai => "lumai",
            OperatorWord::Melomo => "melomo",
            OperatorWord::Flavuk => "flavuk",
            OperatorWord::Dibotada => "dibotada",
            OperatorWord::Poopaye => "poopaye",
            OperatorWord::Pado => "pado",
            OperatorWord::Beedo => "beedo",
            OperatorWord::Con => "con",
            OperatorWord::Nocon => "nocon",
            OperatorWord::La => "la",
            OperatorWord::Lacon => "lacon",
            OperatorWord::Looka => "looka",
            OperatorWord::Too => "too",
            OperatorWord::Tropa => "tropa",
            OperatorWord::BoCa => "bo-ca",
            OperatorWord::Makoroni => "makoroni",
        }
    }
}
