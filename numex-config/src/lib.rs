//! Shared configuration loader for the numex toolchain.
//!
//! `defaults/numex.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files and
//! flag overrides on top of those defaults via [`Loader`] before deserializing
//! into [`NumexConfig`].
//!
//! Numeric thresholds have floors. A value below its floor is raised to it after
//! deserialization, see [`NumexConfig::clamped`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use numex_core::performance::PerformanceThresholds;
use numex_core::{SafetySettings, SortMode};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/numex.default.toml");

const MIN_FILE_SIZE_WARN_BYTES: u64 = 1000;
const MIN_LARGE_OUTPUT_LINES: usize = 100;
const MIN_MANY_DOCUMENTS: usize = 1;
const MIN_MAX_DURATION_MS: u64 = 1000;
const MIN_THROUGHPUT: f64 = 100.0;
const MIN_CACHE_SIZE: usize = 100;

/// Top-level configuration consumed by numex applications.
#[derive(Debug, Clone, Deserialize)]
pub struct NumexConfig {
    pub extraction: ExtractionConfig,
    pub csv: CsvConfig,
    pub notifications: NotificationsConfig,
    pub safety: SafetySettings,
    pub analysis: AnalysisConfig,
    pub performance: PerformanceConfig,
}

/// Post-processing applied to every extraction.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    pub dedupe_enabled: bool,
    pub sort_enabled: bool,
    pub sort_mode: SortMode,
    pub show_parse_errors: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CsvConfig {
    pub streaming_enabled: bool,
    pub has_header: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsConfig {
    pub level: NotificationLevel,
}

/// Which notifications reach the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationLevel {
    /// Info, warnings and errors.
    All,
    /// Warnings and errors only.
    Important,
    /// Nothing.
    Silent,
}

impl NotificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationLevel::All => "all",
            NotificationLevel::Important => "important",
            NotificationLevel::Silent => "silent",
        }
    }
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    pub enabled: bool,
    pub include_stats: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PerformanceConfig {
    pub enabled: bool,
    pub max_duration_ms: u64,
    pub min_throughput: f64,
    pub max_cache_size: usize,
    pub cache_ttl_secs: u64,
}

impl PerformanceConfig {
    pub fn thresholds(&self) -> PerformanceThresholds {
        PerformanceThresholds {
            max_duration_ms: self.max_duration_ms,
            min_throughput: self.min_throughput,
            max_cache_size: self.max_cache_size,
            cache_ttl_secs: self.cache_ttl_secs,
        }
    }
}

impl NumexConfig {
    /// Raise every threshold that is below its floor.
    pub fn clamped(mut self) -> Self {
        let safety = &mut self.safety;
        safety.file_size_warn_bytes = safety.file_size_warn_bytes.max(MIN_FILE_SIZE_WARN_BYTES);
        safety.large_output_lines_threshold = safety
            .large_output_lines_threshold
            .max(MIN_LARGE_OUTPUT_LINES);
        safety.many_documents_threshold = safety.many_documents_threshold.max(MIN_MANY_DOCUMENTS);

        let performance = &mut self.performance;
        performance.max_duration_ms = performance.max_duration_ms.max(MIN_MAX_DURATION_MS);
        performance.min_throughput = performance.min_throughput.max(MIN_THROUGHPUT);
        performance.max_cache_size = performance.max_cache_size.max(MIN_CACHE_SIZE);
        self
    }

    /// Sort mode to apply after extraction, `None` when sorting is disabled.
    pub fn effective_sort(&self) -> Option<SortMode> {
        (self.extraction.sort_enabled && self.extraction.sort_mode != SortMode::Off)
            .then_some(self.extraction.sort_mode)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder, deserialize and clamp the resulting configuration.
    pub fn build(self) -> Result<NumexConfig, ConfigError> {
        let config: NumexConfig = self.builder.build()?.try_deserialize()?;
        Ok(config.clamped())
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<NumexConfig, ConfigError> {
    Loader::new().build()
}
