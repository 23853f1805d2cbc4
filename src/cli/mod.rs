//! CLI support for expression-analyzer
//!
//! Provides programmatic access to the `exprcheck` commands for embedding
//! in other tools (editors, pre-commit hooks).

mod check;
mod docs;
mod format;

pub use check::{execute_check, CheckMode, CheckOptions, CheckResult};
pub use docs::{get_doc_category, get_docs_overview, DocCategory};
pub use format::{execute_format, FormatResult};

use std::io::{self, Read};

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No expression provided. Pass it as an argument or pipe it to stdin.")]
    NoInput,

    #[error("Unknown category: '{0}'\nRun 'exprcheck docs' to see available categories.")]
    UnknownCategory(String),
}

/// Returns the expression argument, or reads it from stdin when stdin is
/// not a terminal. A single trailing newline from stdin is dropped.
pub fn read_expression(argument: Option<String>) -> Result<String, CliError> {
    match argument {
        Some(expression) => Ok(expression),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(strip_trailing_newline(buffer))
        }
        None => Err(CliError::NoInput),
    }
}

fn strip_trailing_newline(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    text
}
