//! YAML extraction
//!
//! Native number scalars only. A quoted `"42"` is a string and stays out, unlike INI and ENV
//! where string values are coerced.

use crate::error::FormatError;
use crate::file_type::FileType;
use crate::format::Extractor;
use crate::value::{Coercion, Node};

pub struct YamlExtractor;

impl Extractor for YamlExtractor {
    fn name(&self) -> &str {
        "yaml"
    }

    fn description(&self) -> &str {
        "YAML documents, native number scalars only"
    }

    fn file_types(&self) -> &[FileType] {
        &[FileType::Yaml, FileType::Yml]
    }

    fn collect(&self, source: &str) -> Result<Vec<f64>, FormatError> {
        // A stream with no document holds no numbers.
        if source.lines().all(|l| {
            let l = l.trim();
            l.is_empty() || l.starts_with('#')
        }) {
            return Ok(Vec::new());
        }
        let value: serde_yaml::Value = serde_yaml::from_str(source)?;
        Ok(Node::from(value).collect_numbers(Coercion::NativeOnly))
    }
}
