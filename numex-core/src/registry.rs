//! Extractor registry for format discovery and selection
//!
//! This module provides a centralized registry for all available extractors.
//! Extractors are registered once and looked up by the file types they declare.

use crate::error::FormatError;
use crate::extraction::ExtractionResult;
use crate::file_type::FileType;
use crate::format::Extractor;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of number extractors
///
/// Each registered extractor is indexed under every [`FileType`] it declares. Extracting from a
/// type with no entry falls back to whatever is registered for [`FileType::Unknown`].
///
/// # Examples
///
/// ```ignore
/// let mut registry = ExtractorRegistry::new();
/// registry.register(JsonExtractor);
///
/// let result = registry.extract("[1, 2]", FileType::Json, "a.json");
/// ```
pub struct ExtractorRegistry {
    extractors: HashMap<FileType, Arc<dyn Extractor>>,
}

impl ExtractorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        ExtractorRegistry {
            extractors: HashMap::new(),
        }
    }

    /// Register an extractor
    ///
    /// Any extractor previously registered for one of its file types is replaced for that type.
    pub fn register<E: Extractor + 'static>(&mut self, extractor: E) {
        let extractor: Arc<dyn Extractor> = Arc::new(extractor);
        for file_type in extractor.file_types() {
            self.extractors.insert(*file_type, Arc::clone(&extractor));
        }
    }

    /// Get the extractor registered for a file type
    pub fn get(&self, file_type: FileType) -> Result<&dyn Extractor, FormatError> {
        self.extractors
            .get(&file_type)
            .map(|e| e.as_ref())
            .ok_or(FormatError::FormatNotFound(file_type))
    }

    /// Check if a file type has an extractor
    pub fn has(&self, file_type: FileType) -> bool {
        self.extractors.contains_key(&file_type)
    }

    /// List extractor names with the file types they serve (sorted by name)
    pub fn list_extractors(&self) -> Vec<(String, Vec<FileType>)> {
        let mut by_name: HashMap<&str, Vec<FileType>> = HashMap::new();
        for (file_type, extractor) in &self.extractors {
            by_name.entry(extractor.name()).or_default().push(*file_type);
        }
        let mut listed: Vec<_> = by_name
            .into_iter()
            .map(|(name, mut types)| {
                types.sort();
                (name.to_string(), types)
            })
            .collect();
        listed.sort();
        listed
    }

    /// Extract numbers from `source` as `file_type`
    ///
    /// Types without an extractor use the [`FileType::Unknown`] entry. With no fallback
    /// registered either, the result is a failed extraction naming the type.
    pub fn extract(&self, source: &str, file_type: FileType, filepath: &str) -> ExtractionResult {
        match self.get(file_type).or_else(|_| self.get(FileType::Unknown)) {
            Ok(extractor) => extractor.extract(source, filepath),
            Err(_) => ExtractionResult::from_outcome(
                Err(FormatError::FormatNotFound(file_type)),
                filepath,
            ),
        }
    }

    /// Create a registry with default extractors
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(crate::formats::JsonExtractor);
        registry.register(crate::formats::YamlExtractor);
        registry.register(crate::formats::TomlExtractor);
        registry.register(crate::formats::IniExtractor);
        registry.register(crate::formats::EnvExtractor);
        registry.register(crate::formats::CsvExtractor);
        registry.register(crate::formats::FallbackExtractor::new());

        registry
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
