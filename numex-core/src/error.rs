//! Error types
//!
//! Two layers live here. [`FormatError`] is what the individual parsers return internally,
//! it carries the underlying parser error and renders with the format-specific prefix.
//! [`ParseError`] is the plain value stored in an [`ExtractionResult`](crate::ExtractionResult):
//! extractors never hand a `FormatError` to their callers, they fold it into exactly one
//! `ParseError`.

use crate::file_type::FileType;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Failure raised while parsing a document in a given format.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse INI: line {line}: {message}")]
    Ini { line: usize, message: String },

    #[error("CSV parse error: {0}")]
    Csv(String),

    #[error("No extractor registered for file type '{0}'")]
    FormatNotFound(FileType),
}

/// Category of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// Malformed input for the declared or detected format.
    ParseError,
    /// Reserved. No extractor currently produces it.
    ValidationError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ParseError => "parse-error",
            ErrorKind::ValidationError => "validation-error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single extraction failure, as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filepath: Option<String>,
}

impl ParseError {
    pub fn parse(message: impl Into<String>, filepath: Option<&str>) -> Self {
        ParseError {
            kind: ErrorKind::ParseError,
            message: message.into(),
            filepath: filepath.filter(|p| !p.is_empty()).map(str::to_string),
        }
    }

    pub fn validation(message: impl Into<String>, filepath: Option<&str>) -> Self {
        ParseError {
            kind: ErrorKind::ValidationError,
            ..ParseError::parse(message, filepath)
        }
    }

    /// Fold a parser failure into the result-level error.
    pub fn from_format_error(err: &FormatError, filepath: &str) -> Self {
        ParseError::parse(err.to_string(), Some(filepath))
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.filepath {
            Some(path) => write!(f, "{} ({}): {}", self.kind, path, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}
