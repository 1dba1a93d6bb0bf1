//! Extractor trait definition
//!
//! This module defines the Extractor trait that every per-format implementation provides.
//! The trait gives a uniform interface: parse text, collect its numbers, report failure as a
//! value.

use crate::error::FormatError;
use crate::extraction::ExtractionResult;
use crate::file_type::FileType;

/// Trait for per-format number extractors
///
/// Implementors only write [`Extractor::collect`], the fallible parse-and-walk. The provided
/// [`Extractor::extract`] turns its outcome into an [`ExtractionResult`], so a parser failure
/// never escapes as an `Err`.
///
/// # Examples
///
/// ```ignore
/// struct LinesExtractor;
///
/// impl Extractor for LinesExtractor {
///     fn name(&self) -> &str {
///         "lines"
///     }
///
///     fn file_types(&self) -> &[FileType] {
///         &[FileType::Unknown]
///     }
///
///     fn collect(&self, source: &str) -> Result<Vec<f64>, FormatError> {
///         Ok(source.lines().filter_map(|l| l.trim().parse().ok()).collect())
///     }
/// }
/// ```
pub trait Extractor: Send + Sync {
    /// The name of this extractor (e.g., "json", "csv")
    fn name(&self) -> &str;

    /// Optional description of this extractor
    fn description(&self) -> &str {
        ""
    }

    /// File types this extractor handles
    fn file_types(&self) -> &[FileType];

    /// Parse `source` and collect its numbers in encounter order
    fn collect(&self, source: &str) -> Result<Vec<f64>, FormatError>;

    /// Run the extractor, capturing any parse failure in the result
    fn extract(&self, source: &str, filepath: &str) -> ExtractionResult {
        let result = ExtractionResult::from_outcome(self.collect(source), filepath);
        tracing::debug!(
            extractor = self.name(),
            filepath,
            count = result.numbers().len(),
            success = result.success(),
            "extracted numbers"
        );
        result
    }
}
