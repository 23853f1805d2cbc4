//! Validate expressions and report tokens, trees or diagnostics

use super::CliError;
use crate::{
    analyzer::Analyzer,
    output::{render_diagnostics, to_json, to_json_pretty, Report},
};

/// What the check command prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckMode {
    /// Human-readable diagnostics with caret underlines
    #[default]
    Diagnostics,
    /// Flat JSON report with integer token codes
    Report,
    /// JSON tokens and errors with named token types
    Tokens,
    /// JSON parse tree
    Tree,
}

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The expression to analyze
    pub expression: String,
    pub mode: CheckMode,
    /// Pretty-print JSON output
    pub pretty: bool,
}

/// Result of a check operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub valid: bool,
    /// Text to print on stdout
    pub output: String,
}

/// Execute a check operation
pub fn execute_check(analyzer: &Analyzer, options: &CheckOptions) -> Result<CheckResult, CliError> {
    let expression = options.expression.as_str();

    let (valid, output) = match options.mode {
        CheckMode::Diagnostics => {
            let result = analyzer.analyze(expression);
            let output = if result.is_valid() {
                "Expression is valid".to_string()
            } else {
                render_diagnostics(expression, &result.errors)
                    .trim_end()
                    .to_string()
            };
            (result.is_valid(), output)
        }
        CheckMode::Report => {
            let report = Report::from_expression(analyzer, expression);
            (report.valid, serialize(&report, options.pretty)?)
        }
        CheckMode::Tokens => {
            let result = analyzer.analyze(expression);
            (result.is_valid(), serialize(&result, options.pretty)?)
        }
        CheckMode::Tree => {
            let result = analyzer.parse_tree(expression);
            (result.tree.is_some(), serialize(&result, options.pretty)?)
        }
    };

    Ok(CheckResult { valid, output })
}

fn serialize<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    let json = if pretty {
        to_json_pretty(value)?
    } else {
        to_json(value)?
    };
    Ok(json)
}
