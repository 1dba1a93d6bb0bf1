//! TOML extraction
//!
//! Integers and floats anywhere in the document: tables, arrays, inline tables and arrays of
//! tables all go through the same walk as JSON. Dates and strings are skipped.

use crate::error::FormatError;
use crate::file_type::FileType;
use crate::format::Extractor;
use crate::value::{Coercion, Node};

pub struct TomlExtractor;

impl Extractor for TomlExtractor {
    fn name(&self) -> &str {
        "toml"
    }

    fn description(&self) -> &str {
        "TOML documents, native integers and floats only"
    }

    fn file_types(&self) -> &[FileType] {
        &[FileType::Toml]
    }

    fn collect(&self, source: &str) -> Result<Vec<f64>, FormatError> {
        let table: toml::Table = toml::from_str(source)?;
        Ok(Node::from(toml::Value::Table(table)).collect_numbers(Coercion::NativeOnly))
    }
}
