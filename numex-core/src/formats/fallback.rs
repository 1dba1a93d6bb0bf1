//! Fallback extraction for unrecognised file types
//!
//! Scans the raw text for integer and decimal literals written with ASCII digits. There is no
//! grammar to violate, so this extractor always succeeds. Exponents are not recognised: `1e5`
//! yields `1` and `5`.

use crate::error::FormatError;
use crate::file_type::FileType;
use crate::format::Extractor;
use crate::numeric::parse_float_prefix;
use once_cell::sync::Lazy;
use regex::Regex;

static NUMBER_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?[0-9]+\.?[0-9]*").expect("number pattern is valid"));

pub struct FallbackExtractor;

impl FallbackExtractor {
    pub fn new() -> Self {
        FallbackExtractor
    }
}

impl Default for FallbackExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for FallbackExtractor {
    fn name(&self) -> &str {
        "fallback"
    }

    fn description(&self) -> &str {
        "any text, numeric literals matched by pattern"
    }

    fn file_types(&self) -> &[FileType] {
        &[FileType::Unknown]
    }

    fn collect(&self, source: &str) -> Result<Vec<f64>, FormatError> {
        Ok(NUMBER_LITERAL
            .find_iter(source)
            .filter_map(|m| parse_float_prefix(m.as_str()))
            .collect())
    }
}
