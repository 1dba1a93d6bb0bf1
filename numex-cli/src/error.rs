//! CLI error type
//!
//! Every failure that should end the process with a non-zero status. `main` prints the message
//! and exits 1.

use numex_config::ConfigError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Extraction failed; carries the message shown to the user.
    #[error("{0}")]
    Extraction(String),

    #[error("Safety check failed: {0}. Use --force to proceed anyway.")]
    Unsafe(String),

    #[error("{0}")]
    Usage(String),

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}
