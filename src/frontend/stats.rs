//! Lexical statistics over a source file

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::frontend::lexer::Lexer;
use crate::frontend::token::{Keyword, TokenKind};

/// Type names that count as "other" rather than as identifiers
const TYPE_NAMES: [&str; 4] = ["Banana", "Papaya", "Gelato", "Spaghetti"];

/// Lexeme counts by category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LexicalStats {
    pub keywords: usize,
    /// Distinct identifier spellings
    pub identifiers: usize,
    pub number_literals: usize,
    pub string_literals: usize,
    pub operators: usize,
    pub other_lexemes: usize,
}

impl LexicalStats {
    pub fn collect(source: &str) -> Self {
        let mut stats = Self::default();
        let mut seen = HashSet::new();

        for token in Lexer::new(source).tokenize() {
            match token.kind {
                TokenKind::Keyword(Keyword::Bello) => {}
                TokenKind::Keyword(Keyword::Loka) => stats.other_lexemes += 1,
                TokenKind::Keyword(_) => stats.keywords += 1,
                TokenKind::Identifier => {
                    if TYPE_NAMES.contains(&token.lexeme.as_str()) {
                        stats.other_lexemes += 1;
                    } else if seen.insert(token.lexeme) {
                        stats.identifiers += 1;
                    }
                }
                TokenKind::NumberLiteral => stats.number_literals += 1,
                TokenKind::StringLiteral => stats.string_literals += 1,
                TokenKind::Operator(_) => stats.operators += 1,
                TokenKind::Whitespace | TokenKind::Comment | TokenKind::EndOfFile => {}
                TokenKind::Delimiter | TokenKind::Error => stats.other_lexemes += 1,
            }
        }

        stats
    }
}

impl fmt::Display for LexicalStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "keywords: {}", self.keywords)?;
        writeln!(f, "identifier: {}", self.identifiers)?;
        writeln!(f, "number literals: {}", self.number_literals)?;
        writeln!(f, "string literals: {}", self.string_literals)?;
        writeln!(f, "operators: {}", self.operators)?;
        write!(f, "other lexemes: {}", self.other_lexemes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stats(
        keywords: usize,
        identifiers: usize,
        numbers: usize,
        strings: usize,
        operators: usize,
        other: usize,
    ) -> LexicalStats {
        LexicalStats {
            keywords,
            identifiers,
            number_literals: numbers,
            string_literals: strings,
            operators,
            other_lexemes: other,
        }
    }

    #[test]
    fn test_greeting_program() {
        let source = "bello!\npoop name Banana naidu!\nguoleila (name) naidu!\ntulalilloo ti amo (!Hello!) naidu!";
        assert_eq!(LexicalStats::collect(source), stats(8, 1, 0, 1, 0, 5));
    }

    #[test]
    fn test_branching_program() {
        let source = "bello!
poop x Banana naidu!
bi-do (x la 10)
oca!
  tulalilloo ti amo (!small!) naidu!
stopa";
        assert_eq!(LexicalStats::collect(source), stats(9, 1, 1, 1, 1, 5));
    }

    #[test]
    fn test_boolean_program() {
        let source = "bello!
poop flag Papaya naidu!
bi-do (flag con Da)
oca!
    tulalilloo ti amo (!True!) naidu!
stopa";
        assert_eq!(LexicalStats::collect(source), stats(10, 1, 0, 1, 1, 5));
    }

    #[test]
    fn test_loka_and_errors_are_other() {
        let source = "loka 123abc // note";
        assert_eq!(LexicalStats::collect(source), stats(0, 0, 0, 0, 0, 2));
    }

    #[test]
    fn test_display() {
        let rendered = stats(1, 2, 3, 4, 5, 6).to_string();
        assert_eq!(
            rendered,
            "keywords: 1\nidentifier: 2\nnumber literals: 3\nstring literals: 4\noperators: 5\nother lexemes: 6"
        );
    }
}
