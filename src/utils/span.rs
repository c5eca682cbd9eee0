//! Source location tracking

use serde::Serialize;

/// A span represents a range in the (newline-normalized) source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    /// Start offset, in characters
    pub start: usize,
    /// End offset (exclusive), in characters
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create an empty span at `offset`
    pub fn point(offset: usize) -> Self {
        Self { start: offset, end: offset }
    }

    /// Create a dummy span (for testing)
    pub fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }

    /// Merge two spans
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Get the length of the span
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// 1-based line and column of the span start within `source`.
    ///
    /// `source` must be the same text the span was produced from; carriage
    /// returns are treated the way the lexer normalizes them.
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let mut line = 1;
        let mut col = 1;
        let mut chars = source.chars().peekable();
        let mut offset = 0;
        while offset < self.start {
            let Some(c) = chars.next() else { break };
            match c {
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    line += 1;
                    col = 1;
                }
                '\n' => {
                    line += 1;
                    col = 1;
                }
                _ => col += 1,
            }
            offset += 1;
        }
        (line, col)
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::dummy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge() {
        let a = Span::new(2, 5);
        let b = Span::new(4, 9);
        assert_eq!(a.merge(&b), Span::new(2, 9));
        assert_eq!(a.merge(&b).len(), 7);
    }

    #[test]
    fn test_line_col() {
        let source = "bello!\npoop x Papaya naidu!";
        assert_eq!(Span::point(0).line_col(source), (1, 1));
        assert_eq!(Span::point(12).line_col(source), (2, 6));
    }

    #[test]
    fn test_line_col_crlf() {
        let source = "bello!\r\nstopa";
        // "\r\n" collapses to a single normalized character
        assert_eq!(Span::point(7).line_col(source), (2, 1));
    }
}
