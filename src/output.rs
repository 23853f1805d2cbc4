//! Serialized and human-readable views of analysis results.
//!
//! - [`to_json()`] / [`to_json_pretty()`] - the full [`AnalysisResult`]
//! - [`Report`] - flat boundary shape with integer token codes, for callers
//!   that cannot consume Rust enums
//! - [`render_diagnostics()`] - `line:col: message` with the offending source
//!   line and a caret underline
//!
//! # Examples
//!
//! ```
//! use expression_analyzer::{analyze, output::to_json};
//!
//! let json = to_json(&analyze("[age] > 18")).unwrap();
//! assert!(json.contains("\"columnReference\""));
//! ```

use serde::Serialize;

use crate::{
    analyzer::{AnalysisResult, Analyzer},
    ast::Token,
    error::SyntaxError,
};

/// Compact JSON for an analysis result.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// Pretty-printed JSON (2-space indentation).
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Token with its type flattened to the stable integer code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportToken {
    #[serde(rename = "type")]
    pub token_type: u8,
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
    pub is_valid: bool,
}

impl From<&Token> for ReportToken {
    fn from(token: &Token) -> Self {
        ReportToken {
            token_type: token.token_type.code(),
            text: token.text.clone(),
            start: token.start,
            end: token.end,
            line: token.line,
            column: token.column,
            is_valid: token.is_valid,
        }
    }
}

/// Self-contained result handed across a process or language boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub valid: bool,
    pub tokens: Vec<ReportToken>,
    pub errors: Vec<SyntaxError>,
}

impl Report {
    /// Analyzes `expression`. Empty input short-circuits to an invalid
    /// report with no tokens and no errors.
    pub fn from_expression(analyzer: &Analyzer, expression: &str) -> Report {
        if expression.is_empty() {
            return Report {
                valid: false,
                tokens: Vec::new(),
                errors: Vec::new(),
            };
        }
        Report::from_result(&analyzer.analyze(expression))
    }

    pub fn from_result(result: &AnalysisResult) -> Report {
        Report {
            valid: result.is_valid(),
            tokens: result.tokens.iter().map(ReportToken::from).collect(),
            errors: result.errors.clone(),
        }
    }
}

/// Renders each error as `line:col: message`, followed by the source line
/// and a caret underline of the error span.
///
/// ```text
/// 1:7: Unexpected end of expression: missing right operand for operator '>'
///   [age] >
///         ^
/// ```
pub fn render_diagnostics(source: &str, errors: &[SyntaxError]) -> String {
    let lines: Vec<&str> = source.split('\n').collect();
    let mut out = String::new();

    for error in errors {
        out.push_str(&error.to_string());
        out.push('\n');

        let Some(line) = lines.get(error.line.saturating_sub(1)) else {
            continue;
        };
        let prefix = " ".repeat(error.column.saturating_sub(1));
        // Underline at least one column, and stop at the end of the line
        let remaining = line.chars().count().saturating_sub(error.column.saturating_sub(1));
        let width = source
            .get(error.start..error.end)
            .map_or(0, |text| text.split('\n').next().unwrap_or_default().chars().count())
            .min(remaining)
            .max(1);

        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
        out.push_str("  ");
        out.push_str(&prefix);
        out.push_str(&"^".repeat(width));
        out.push('\n');
    }
    out
}
