//! Reformat expressions

use crate::{analyzer::Analyzer, formatter::FormatOptions, output::render_diagnostics};

/// Result of a format operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatResult {
    pub valid: bool,
    /// Formatted expression, or the input unchanged when it is invalid
    pub output: String,
    /// Rendered diagnostics for invalid input
    pub diagnostics: Option<String>,
}

pub fn execute_format(
    analyzer: &Analyzer,
    expression: &str,
    options: &FormatOptions,
) -> FormatResult {
    let parsed = analyzer.parse(expression);
    if !parsed.is_valid() {
        return FormatResult {
            valid: false,
            output: expression.to_string(),
            diagnostics: Some(render_diagnostics(expression, &parsed.errors)),
        };
    }

    FormatResult {
        valid: true,
        output: analyzer.format(expression, options),
        diagnostics: None,
    }
}
