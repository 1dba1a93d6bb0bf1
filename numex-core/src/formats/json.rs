//! JSON extraction
//!
//! Every JSON number counts; strings are never coerced, so `"42"` contributes nothing.

use crate::error::FormatError;
use crate::file_type::FileType;
use crate::format::Extractor;
use crate::value::{Coercion, Node};

pub struct JsonExtractor;

impl Extractor for JsonExtractor {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "JSON documents, native numbers only"
    }

    fn file_types(&self) -> &[FileType] {
        &[FileType::Json]
    }

    fn collect(&self, source: &str) -> Result<Vec<f64>, FormatError> {
        let value: serde_json::Value = serde_json::from_str(source)?;
        Ok(Node::from(value).collect_numbers(Coercion::NativeOnly))
    }
}
