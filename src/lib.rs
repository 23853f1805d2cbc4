pub mod analyzer;
pub mod ast;
pub mod config;
pub mod error;
pub mod formatter;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod tree;

#[cfg(feature = "cli")]
pub mod cli;

pub use analyzer::{analyze, validate, AnalysisResult, Analyzer, Parsed};
pub use ast::{BinOp, Expr, ExprKind, Span, Token, TokenType};
pub use config::{AnalyzerConfig, Config, ConfigError};
pub use error::{SyntaxError, SyntaxErrorKind};
pub use formatter::{FormatOptions, Formatter};
pub use lexer::{Lexer, Position};
pub use output::{to_json, to_json_pretty, Report};
pub use parser::Parser;
pub use tree::{NodeType, ParseTreeNode, ParseTreeResult};
