//! File type detection
//!
//! The detector only looks at the filename: the substring after the last `.`, lowercased,
//! mapped through a fixed table. It never reads the document.
//!
//! `yml` and `yaml` are distinct tags. The registry routes both to the YAML extractor, and the
//! detector reports `yaml` for either extension.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Json,
    Yaml,
    Yml,
    Csv,
    Toml,
    Ini,
    Env,
    Unknown,
}

impl FileType {
    /// Every tag, in declaration order.
    pub const ALL: [FileType; 8] = [
        FileType::Json,
        FileType::Yaml,
        FileType::Yml,
        FileType::Csv,
        FileType::Toml,
        FileType::Ini,
        FileType::Env,
        FileType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Json => "json",
            FileType::Yaml => "yaml",
            FileType::Yml => "yml",
            FileType::Csv => "csv",
            FileType::Toml => "toml",
            FileType::Ini => "ini",
            FileType::Env => "env",
            FileType::Unknown => "unknown",
        }
    }

    /// Map a bare extension (no dot) to a tag. Case-insensitive.
    pub fn from_extension(ext: &str) -> FileType {
        match ext.to_lowercase().as_str() {
            "json" => FileType::Json,
            "yaml" | "yml" => FileType::Yaml,
            "csv" => FileType::Csv,
            "toml" => FileType::Toml,
            "ini" => FileType::Ini,
            "env" => FileType::Env,
            _ => FileType::Unknown,
        }
    }
}

/// Detect the file type of a path or bare filename.
pub fn detect_file_type(filename: &str) -> FileType {
    match filename.rsplit_once('.') {
        Some((_, ext)) => FileType::from_extension(ext),
        None => FileType::Unknown,
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = String;

    /// Parse a tag name as given by a user. Unlike [`FileType::from_extension`], `yml` stays
    /// `yml` and unrecognized names are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        FileType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| {
                format!(
                    "Unknown file type '{}' (expected one of: {})",
                    s,
                    FileType::ALL.map(|t| t.as_str()).join(", ")
                )
            })
    }
}
