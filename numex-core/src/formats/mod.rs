//! Format implementations
//!
//! One extractor per supported file type, plus the pattern-based fallback used for anything
//! unrecognised. JSON, YAML and TOML parse with their ecosystem crates and walk the shared value
//! tree; INI, dotenv and CSV have small line grammars of their own.

pub mod csv;
pub mod env;
pub mod fallback;
pub mod ini;
pub mod json;
pub mod toml;
pub mod yaml;

pub use self::csv::{csv_column_count, extract_csv_column, CsvExtractor};
pub use self::env::EnvExtractor;
pub use self::fallback::FallbackExtractor;
pub use self::ini::IniExtractor;
pub use self::json::JsonExtractor;
pub use self::toml::TomlExtractor;
pub use self::yaml::YamlExtractor;
