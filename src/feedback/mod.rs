//! Structured Feedback Module
//!
//! Turns interpreter errors into diagnostics:
//! - JSON error reports with fix suggestions
//! - `error[CODE]: message` text for terminals
//! - check summaries carrying lexical statistics

use std::fmt;

use serde::Serialize;

use crate::frontend::stats::LexicalStats;
use crate::utils::{Arity, Error};

// ==================== Structured Error Report ====================

/// A structured error report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    /// Error code (e.g., "E0101")
    pub code: String,

    pub severity: Severity,

    /// Pipeline phase: lex, syntax, runtime or environment
    pub phase: String,

    /// Human-readable message
    pub message: String,

    pub location: Option<Location>,

    /// Suggested fixes
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
        }
    }
}

/// 1-based position in a source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    /// Description of the fix
    pub message: String,

    /// Text that could be inserted or substituted
    pub replacement: Option<String>,
}

impl Suggestion {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            replacement: None,
        }
    }

    fn with_replacement(message: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            replacement: Some(replacement.into()),
        }
    }
}

impl ErrorReport {
    /// Build a report for `error`; `source` resolves the span to line/column
    pub fn from_error(error: &Error, file_name: &str, source: &str) -> Self {
        let location = error.span().map(|span| {
            let (line, column) = span.line_col(source);
            Location {
                file: file_name.to_string(),
                line,
                column,
            }
        });

        Self {
            code: error.code().to_string(),
            severity: Severity::Error,
            phase: error.phase().to_string(),
            message: error.to_string(),
            location,
            suggestions: suggestions_for(error),
        }
    }

    /// Output as JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Renders as `error[E0202]: message`, a `-->` location line and one
/// `= help:` line per suggestion
impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
        if let Some(location) = &self.location {
            write!(
                f,
                "\n  --> {}:{}:{}",
                location.file, location.line, location.column
            )?;
        }
        for suggestion in &self.suggestions {
            write!(f, "\n   = help: {}", suggestion.message)?;
        }
        Ok(())
    }
}

fn suggestions_for(error: &Error) -> Vec<Suggestion> {
    match error {
        Error::Lex { lexeme, .. } => vec![Suggestion::new(format!(
            "separate the number from the letters in '{}' with a space",
            lexeme
        ))],

        Error::UnexpectedEof { .. } => vec![Suggestion::with_replacement(
            "every 'oca!' block must be closed with 'stopa'",
            "stopa",
        )],

        Error::UnsupportedType { .. } => vec![Suggestion::with_replacement(
            "declare the value as Papaya",
            "Papaya",
        )],

        Error::DuplicateDeclaration { name, .. } => vec![
            Suggestion::new(format!("rename one of the declarations of '{}'", name)),
            Suggestion::new("declare the inner one inside its own 'oca!' block to shadow it"),
        ],

        Error::UnknownVariable { name, .. } => vec![
            Suggestion::with_replacement(
                format!("declare '{}' before using it", name),
                format!("poop {} Papaya naidu!", name),
            ),
            Suggestion::new("functions see only their parameters, their own locals and globals"),
        ],

        Error::UnknownFunction { name, .. } => vec![Suggestion::with_replacement(
            format!("define '{}' with 'boss'", name),
            format!("boss {} Papaya () oca!\n    tank yu 0 naidu!\nstopa", name),
        )],

        Error::ArityMismatch { expected, got, .. } => match *expected {
            Arity::Exactly(n) if *got < n => {
                vec![Suggestion::new(format!("add {} more argument(s)", n - got))]
            }
            Arity::Exactly(n) => {
                vec![Suggestion::new(format!("remove {} extra argument(s)", got - n))]
            }
            Arity::AtLeast(n) => vec![Suggestion::new(format!("pass at least {} argument(s)", n))],
        },

        Error::NestingTooDeep { limit, .. } => vec![Suggestion::new(format!(
            "split the expression or block so it nests at most {} levels; long operator chains count too",
            limit
        ))],

        Error::RecursionLimit { name, .. } => vec![
            Suggestion::new(format!("check that every path through '{}' reaches a base case", name)),
            Suggestion::new("rewrite deep recursion as a 'kemari' or 'again' loop"),
        ],

        Error::DivisionByZero { .. } => vec![Suggestion::new(
            "guard the division with 'bi-do (divisor nocon 0)'",
        )],

        Error::MissingReturn { .. } => vec![Suggestion::with_replacement(
            "end every path through the function with 'tank yu'",
            "tank yu 0 naidu!",
        )],

        Error::ReturnOutsideFunction { .. } => vec![Suggestion::new(
            "use 'tulalilloo ti amo' to print a value at the top level",
        )],

        Error::UnsupportedFeature { .. } => vec![Suggestion::new(
            "string literals cannot be evaluated; only numbers are values",
        )],

        Error::ConstantReassignment { name, .. } => vec![Suggestion::with_replacement(
            format!("declare '{}' as a variable instead of a constant", name),
            format!("poop {} Papaya naidu!", name),
        )],

        Error::InputExhausted => vec![Suggestion::new(
            "provide one number per line on standard input",
        )],

        Error::InvalidInput { .. } => vec![Suggestion::new(
            "input must be a decimal number such as 42 or -3.5",
        )],

        _ => vec![],
    }
}

// ==================== Check Feedback ====================

/// Result of `minion check`
#[derive(Debug, Clone, Serialize)]
pub struct CheckFeedback {
    pub success: bool,

    pub source_file: String,

    /// All errors found (at most one, parsing stops at the first)
    pub diagnostics: Vec<ErrorReport>,

    pub stats: LexicalStats,

    /// Top-level items in the parsed program
    pub item_count: usize,
}

impl CheckFeedback {
    pub fn success(source_file: String, stats: LexicalStats, item_count: usize) -> Self {
        Self {
            success: true,
            source_file,
            diagnostics: vec![],
            stats,
            item_count,
        }
    }

    pub fn failure(source_file: String, error: ErrorReport, stats: LexicalStats) -> Self {
        Self {
            success: false,
            source_file,
            diagnostics: vec![error],
            stats,
            item_count: 0,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parser::parse_program;
    use crate::utils::Span;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_report_location() {
        let source = "bello!\npoop x Papaya naidu!\ny lumai 1 naidu!";
        let error = Error::UnknownVariable {
            name: "y".to_string(),
            span: Span::new(28, 29),
        };
        let report = ErrorReport::from_error(&error, "demo.mns", source);
        assert_eq!(report.code, "E0202");
        assert_eq!(report.phase, "runtime");
        assert_eq!(
            report.location,
            Some(Location {
                file: "demo.mns".to_string(),
                line: 3,
                column: 1,
            })
        );
        assert_eq!(
            report.suggestions[0].replacement.as_deref(),
            Some("poop y Papaya naidu!")
        );
    }

    #[test]
    fn test_render_parse_error() {
        let source = "bello!\nbi-do (da) oca!\n";
        let error = parse_program(source).unwrap_err();
        let report = ErrorReport::from_error(&error, "open.mns", source);
        let rendered = report.to_string();
        assert!(rendered.starts_with("error[E0102]: Unexpected end of input"));
        assert!(rendered.contains("\n  --> open.mns:3:1"));
        assert!(rendered.contains("= help: every 'oca!' block must be closed with 'stopa'"));
    }

    #[test]
    fn test_report_without_span() {
        let report = ErrorReport::from_error(&Error::InputExhausted, "a.mns", "");
        assert_eq!(report.location, None);
        assert_eq!(report.to_string().lines().next(), Some("error[E0301]: No input available"));
    }

    #[test]
    fn test_arity_suggestions() {
        let error = Error::ArityMismatch {
            name: "add".to_string(),
            expected: Arity::Exactly(2),
            got: 3,
            span: Span::dummy(),
        };
        let report = ErrorReport::from_error(&error, "a.mns", "");
        assert_eq!(report.suggestions, vec![Suggestion::new("remove 1 extra argument(s)")]);
    }

    #[test]
    fn test_recursion_limit_report() {
        let error = Error::RecursionLimit {
            name: "forever".to_string(),
            limit: 128,
            span: Span::new(7, 18),
        };
        let report = ErrorReport::from_error(&error, "loop.mns", "bello!\nforever(0) naidu!");
        assert_eq!(report.code, "E0212");
        assert_eq!(report.phase, "runtime");
        assert!(report.to_string().starts_with("error[E0212]: Call depth limit of 128 reached in 'forever'"));
        assert_eq!(report.suggestions.len(), 2);
    }

    #[test]
    fn test_nesting_report() {
        let source = format!("bello!\ntulalilloo ti amo ({}1{}) naidu!", "(".repeat(200), ")".repeat(200));
        let error = parse_program(&source).unwrap_err();
        let report = ErrorReport::from_error(&error, "deep.mns", &source);
        assert_eq!(report.code, "E0106");
        assert_eq!(report.phase, "syntax");
    }

    #[test]
    fn test_json_shape() {
        let report = ErrorReport::from_error(
            &Error::DivisionByZero {
                span: Span::new(7, 19),
            },
            "div.mns",
            "bello!\n10 poopaye 0 naidu!",
        );
        let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
        assert_eq!(json["code"], "E0205");
        assert_eq!(json["severity"], "error");
        assert_eq!(json["location"]["line"], 2);
        assert_eq!(json["location"]["column"], 1);
    }
}
