//! Error types and error handling for the vault indexer.
//!
//! Fatal errors (discovery, configuration) abort a run. Everything
//! else is captured per file or per batch and reported in the
//! run result instead of being propagated.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for indexer operations
pub type Result<T> = std::result::Result<T, IndexerError>;

/// Main error type for the indexer
#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("Discovery failed: {0}")]
    DiscoveryFailed(String),

    #[error("Failed to process {}: {message}", path.display())]
    FileFailed { path: PathBuf, message: String },

    #[error("Upsert failed: {0}")]
    UpsertFailed(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl IndexerError {
    /// Build a per-file error from any displayable cause
    pub fn file(path: impl Into<PathBuf>, cause: impl std::fmt::Display) -> Self {
        IndexerError::FileFailed {
            path: path.into(),
            message: cause.to_string(),
        }
    }
}
