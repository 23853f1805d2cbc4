//! Analyzer and formatter settings.
//!
//! Everything has a default, so an empty JSON object (or no file at all) is
//! a complete configuration:
//!
//! ```json
//! {
//!   "analyzer": { "max_depth": 64 },
//!   "format": { "indent_size": 4, "max_line_length": 80 }
//! }
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{formatter::FormatOptions, parser::DEFAULT_MAX_DEPTH};

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings for the lexer/parser pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Deepest allowed nesting of parentheses, calls, brackets and unary
    /// minus before analysis reports `NestingTooDeep`.
    pub max_depth: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl AnalyzerConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analyzer: AnalyzerConfig,
    pub format: FormatOptions,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_object_uses_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.analyzer.max_depth, 128);
        assert_eq!(config.format.indent_size, 2);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_json(r#"{"format": {"max_line_length": 80}}"#).unwrap();
        assert_eq!(config.format.max_line_length, 80);
        assert_eq!(config.format.indent_size, 2);
        assert!(config.format.space_around_ops);
        assert_eq!(config.analyzer.max_depth, 128);
    }

    #[test]
    fn reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"analyzer": {{"max_depth": 16}}}}"#).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.analyzer.max_depth, 16);
    }

    #[test]
    fn reports_missing_file_and_bad_json() {
        let err = Config::from_file("/nonexistent/exprcheck.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/exprcheck.json"));

        let err = Config::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
