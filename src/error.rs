//! Syntax diagnostics.
//!
//! Invalid input is reported as data: every problem the lexer or parser
//! finds becomes a [`SyntaxError`] in the analysis result, never a panic or
//! an `Err` crossing the public API.

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use crate::ast::{Span, Token};

/// What went wrong, independent of the human-readable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntaxErrorKind {
    // Lexical
    /// A character no lexical rule accepts (`#`, a lone `=`)
    UnexpectedCharacter,
    /// String literal without its closing quote
    UnterminatedString,
    /// Digits running into letters (`123abc`)
    InvalidNumber,
    /// `[name` without the closing `]`
    UnclosedColumnReference,
    /// A word that is not a keyword, function or bracketed column
    BareIdentifier,

    // Structural
    /// A token that cannot appear where it was found
    UnexpectedToken,
    /// Operator without one of its operands
    MissingOperand,
    /// Input ended while an operand or delimiter was still expected
    UnexpectedEof,
    /// `)` with no matching `(`
    UnmatchedParen,
    /// `(` with no matching `)`
    UnclosedParen,
    /// `]` with no matching `[`
    UnmatchedBracket,
    /// `[` not followed by a column name
    InvalidColumnReference,
    /// `()` used as an operand
    EmptyParentheses,
    /// Comma directly before the closing `)` of an argument list
    TrailingComma,
    /// Comma with no argument before it
    MissingArgument,
    /// Function name outside `[A-Z][A-Z0-9_]*`
    InvalidFunctionName,
    /// Nothing to analyze
    EmptyExpression,

    // Guards
    /// Nesting deeper than the configured maximum
    NestingTooDeep,
    /// The lexer failed to consume input
    LexerStalled,
}

/// One detected problem, positioned in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{line}:{column}: {message}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub message: String,
    /// 1-based line of `start`.
    pub line: usize,
    /// 1-based column of `start`, counted in characters.
    pub column: usize,
    pub start: usize,
    pub end: usize,
}

impl SyntaxError {
    pub fn new(
        kind: SyntaxErrorKind,
        message: impl Into<String>,
        span: Span,
        line: usize,
        column: usize,
    ) -> Self {
        SyntaxError {
            kind,
            message: message.into(),
            line,
            column,
            start: span.start,
            end: span.end,
        }
    }

    /// Error covering exactly `token`.
    pub fn at_token(kind: SyntaxErrorKind, message: impl Into<String>, token: &Token) -> Self {
        Self::new(kind, message, token.span(), token.line, token.column)
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

/// Merges lexer and parser diagnostics into one list ordered by source
/// position. Ties keep lexer errors first. Repeats of the same kind over the
/// same span are dropped.
pub(crate) fn merge(lexical: Vec<SyntaxError>, structural: Vec<SyntaxError>) -> Vec<SyntaxError> {
    let mut merged = lexical;
    merged.extend(structural);
    merged.sort_by_key(|e| e.start);

    let mut seen = HashSet::with_capacity(merged.len());
    merged.retain(|error| seen.insert((error.kind, error.span())));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn err(kind: SyntaxErrorKind, start: usize, end: usize) -> SyntaxError {
        SyntaxError::new(kind, "x", Span::new(start, end), 1, start + 1)
    }

    #[test]
    fn merge_interleaves_by_position() {
        let lexical = vec![
            err(SyntaxErrorKind::BareIdentifier, 0, 3),
            err(SyntaxErrorKind::UnexpectedCharacter, 10, 11),
        ];
        let structural = vec![err(SyntaxErrorKind::MissingOperand, 5, 6)];

        let merged = merge(lexical, structural);
        let starts: Vec<usize> = merged.iter().map(|e| e.start).collect();
        assert_eq!(starts, vec![0, 5, 10]);
    }

    #[test]
    fn merge_keeps_lexer_first_on_ties() {
        let lexical = vec![err(SyntaxErrorKind::UnclosedColumnReference, 4, 8)];
        let structural = vec![err(SyntaxErrorKind::UnexpectedToken, 4, 8)];

        let merged = merge(lexical, structural);
        assert_eq!(merged[0].kind, SyntaxErrorKind::UnclosedColumnReference);
        assert_eq!(merged[1].kind, SyntaxErrorKind::UnexpectedToken);
    }

    #[test]
    fn merge_drops_duplicates() {
        let merged = merge(
            vec![err(SyntaxErrorKind::UnexpectedCharacter, 2, 3)],
            vec![
                err(SyntaxErrorKind::UnexpectedCharacter, 2, 3),
                err(SyntaxErrorKind::UnexpectedCharacter, 2, 3),
            ],
        );
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn display_includes_position() {
        let e = SyntaxError::new(
            SyntaxErrorKind::MissingOperand,
            "Missing right operand for operator '+'",
            Span::new(2, 3),
            1,
            3,
        );
        assert_eq!(e.to_string(), "1:3: Missing right operand for operator '+'");
    }
}
