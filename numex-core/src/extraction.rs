//! Extraction results and the top-level entry points
//!
//! [`extract_numbers`] is the pipeline's front door: detector output in, [`ExtractionResult`]
//! out. It uses the default registry, so callers that want a custom set of extractors should
//! go through [`ExtractorRegistry`] directly.

use crate::error::{FormatError, ParseError};
use crate::file_type::FileType;
use crate::numeric::parse_strict;
use crate::registry::ExtractorRegistry;
use once_cell::sync::Lazy;
use serde::Serialize;

static DEFAULT_REGISTRY: Lazy<ExtractorRegistry> = Lazy::new(ExtractorRegistry::with_defaults);

/// Outcome of running one extractor over one document.
///
/// Either the document parsed and `numbers` holds every number found (possibly none), or it
/// did not and `errors` holds exactly one entry while `numbers` is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    success: bool,
    numbers: Vec<f64>,
    errors: Vec<ParseError>,
}

impl ExtractionResult {
    pub fn ok(numbers: Vec<f64>) -> Self {
        ExtractionResult {
            success: true,
            numbers,
            errors: Vec::new(),
        }
    }

    pub fn failed(error: ParseError) -> Self {
        ExtractionResult {
            success: false,
            numbers: Vec::new(),
            errors: vec![error],
        }
    }

    /// Build a result from a parser outcome, folding any error into a single [`ParseError`].
    pub fn from_outcome(outcome: Result<Vec<f64>, FormatError>, filepath: &str) -> Self {
        match outcome {
            Ok(numbers) => ExtractionResult::ok(numbers),
            Err(err) => {
                tracing::warn!(filepath, error = %err, "extraction failed");
                ExtractionResult::failed(ParseError::from_format_error(&err, filepath))
            }
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn numbers(&self) -> &[f64] {
        &self.numbers
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Message of the first error, if the extraction failed.
    pub fn first_error_message(&self) -> Option<&str> {
        self.errors.first().map(|e| e.message.as_str())
    }

    pub fn into_numbers(self) -> Vec<f64> {
        self.numbers
    }
}

/// Extract numbers from `text` as `file_type`, using the default extractors.
pub fn extract_numbers(text: &str, file_type: FileType, filepath: &str) -> ExtractionResult {
    DEFAULT_REGISTRY.extract(text, file_type, filepath)
}

/// Read a document that is already a plain list of numbers, one per line.
///
/// Returns `None` unless there is at least one non-blank line and every non-blank line is a
/// number literal under strict parsing. Non-finite literals (`Infinity`, `1e400`) qualify the
/// document but are left out of the returned list.
pub fn parse_numbers_document(text: &str) -> Option<Vec<f64>> {
    let mut saw_line = false;
    let mut numbers = Vec::new();

    for line in text.split('\n') {
        if line.trim().is_empty() {
            continue;
        }
        saw_line = true;
        let value = parse_strict(line)?;
        if value.is_finite() {
            numbers.push(value);
        }
    }

    saw_line.then_some(numbers)
}
