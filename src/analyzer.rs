use serde::Serialize;
use tracing::debug;

use crate::{
    ast::{Expr, Token},
    config::AnalyzerConfig,
    error::{self, SyntaxError},
    formatter::{FormatOptions, Formatter},
    lexer::Lexer,
    parser::Parser,
    tree::{ParseTreeNode, ParseTreeResult},
};

/// Tokens and diagnostics for one analyzed expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// Every token in source order, whitespace included, ending with EOF.
    pub tokens: Vec<Token>,
    /// Lexical and structural errors ordered by position.
    pub errors: Vec<SyntaxError>,
}

impl AnalysisResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Full pipeline output, including the syntax tree.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub tokens: Vec<Token>,
    /// `None` only when there was nothing to parse.
    pub expr: Option<Expr>,
    pub errors: Vec<SyntaxError>,
}

impl Parsed {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Stateless entry point to the lexer/parser pipeline.
///
/// Holds only configuration, so one instance can be shared across threads
/// and reused for any number of expressions.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        Analyzer { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Lexes and parses `source`, merging both error lists by position.
    pub fn parse(&self, source: &str) -> Parsed {
        let (tokens, lexical) = Lexer::tokenize(source);
        let (expr, structural) = Parser::new(&tokens, self.config.max_depth).parse();
        let errors = error::merge(lexical, structural);

        debug!(
            len = source.len(),
            tokens = tokens.len(),
            errors = errors.len(),
            "analyzed expression"
        );

        Parsed {
            tokens,
            expr,
            errors,
        }
    }

    pub fn analyze(&self, source: &str) -> AnalysisResult {
        let Parsed { tokens, errors, .. } = self.parse(source);
        AnalysisResult { tokens, errors }
    }

    pub fn validate(&self, source: &str) -> bool {
        self.parse(source).is_valid()
    }

    /// Syntax tree for display; only produced for valid input.
    pub fn parse_tree(&self, source: &str) -> ParseTreeResult {
        let parsed = self.parse(source);
        let tree = match parsed.expr {
            Some(expr) if parsed.errors.is_empty() => Some(ParseTreeNode::from_expr(&expr, source)),
            _ => None,
        };
        ParseTreeResult {
            tree,
            errors: parsed.errors,
        }
    }

    /// Canonical layout of `source`; see [`Formatter`].
    pub fn format(&self, source: &str, options: &FormatOptions) -> String {
        Formatter::new(options.clone())
            .with_analyzer(self.clone())
            .format(source)
    }
}

/// Analyzes `source` with the default configuration.
pub fn analyze(source: &str) -> AnalysisResult {
    Analyzer::new().analyze(source)
}

/// Checks `source` with the default configuration.
pub fn validate(source: &str) -> bool {
    Analyzer::new().validate(source)
}
