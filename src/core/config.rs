//! Configuration management for the vault indexer.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{IndexerError, Result};
use crate::core::indexer::chunker::MIN_CHUNK_CHARS;
use crate::core::xdg::XdgDirs;
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub vault: VaultConfig,
    #[serde(default)]
    pub indexing: IndexingConfig,
}

/// Vault location and layout
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VaultConfig {
    /// Vault root directory
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Subdirectories of the root to index
    #[serde(default = "default_directories")]
    pub directories: Vec<String>,

    /// Change-state sidecar file, relative to the root
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
}

/// When a processed file's change record is committed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordPolicy {
    /// Commit only after the batch carrying the file was upserted
    #[default]
    Confirmed,
    /// Commit as soon as the file is queued for upload
    Optimistic,
}

/// Indexing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexingConfig {
    /// Target characters per chunk (not bytes!)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Character overlap between consecutive size-based chunks
    #[serde(default = "default_overlap")]
    pub overlap: usize,

    /// Documents per upsert call
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// File extensions to index, without the dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// File patterns to exclude (glob syntax)
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    #[serde(default)]
    pub record_policy: RecordPolicy,
}

// Default value functions
fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_directories() -> Vec<String> {
    vec!["notes".to_string(), "projects".to_string()]
}

fn default_state_file() -> PathBuf {
    PathBuf::from(".obsidian_index.json")
}

fn default_chunk_size() -> usize {
    2000
}

fn default_overlap() -> usize {
    200
}

fn default_batch_size() -> usize {
    50
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string()]
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            directories: default_directories(),
            state_file: default_state_file(),
        }
    }
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
            batch_size: default_batch_size(),
            extensions: default_extensions(),
            exclude_patterns: Vec::new(),
            record_policy: RecordPolicy::default(),
        }
    }
}

impl VaultConfig {
    /// Absolute-or-relative path of the change-state sidecar
    pub fn state_path(&self) -> PathBuf {
        if self.state_file.is_absolute() {
            self.state_file.clone()
        } else {
            self.root.join(&self.state_file)
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| IndexerError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Configuration for a vault with default indexing settings
    pub fn for_vault(root: impl Into<PathBuf>, directories: Vec<String>) -> Self {
        Self {
            vault: VaultConfig {
                root: root.into(),
                directories,
                state_file: default_state_file(),
            },
            indexing: IndexingConfig::default(),
        }
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        xdg.log_paths();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order:
    /// 1. VAULT_INDEXER_CONFIG env var
    /// 2. XDG config file (~/.config/vault-indexer/config.toml)
    /// 3. ./vault-indexer.toml
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("VAULT_INDEXER_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("vault-indexer.toml").exists() {
                Self::from_file("vault-indexer.toml")?
            } else {
                Self::default()
            }
        };

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        if let Ok(root) = env::var("VAULT_INDEXER_VAULT") {
            self.vault.root = PathBuf::from(root);
        }
        if let Ok(dirs) = env::var("VAULT_INDEXER_DIRECTORIES") {
            let parsed: Vec<String> = dirs
                .split(',')
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .collect();
            if !parsed.is_empty() {
                self.vault.directories = parsed;
            }
        }

        if let Ok(chunk_size) = env::var("VAULT_INDEXER_CHUNK_SIZE") {
            if let Ok(size) = chunk_size.parse() {
                self.indexing.chunk_size = size;
            }
        }
        if let Ok(overlap) = env::var("VAULT_INDEXER_OVERLAP") {
            if let Ok(o) = overlap.parse() {
                self.indexing.overlap = o;
            }
        }
        if let Ok(batch_size) = env::var("VAULT_INDEXER_BATCH_SIZE") {
            if let Ok(size) = batch_size.parse() {
                self.indexing.batch_size = size;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.vault.directories.is_empty() {
            return Err(IndexerError::ConfigError(
                "At least one vault directory is required".to_string(),
            ));
        }

        if self.indexing.chunk_size < MIN_CHUNK_CHARS {
            return Err(IndexerError::ConfigError(format!(
                "Chunk size must be at least {MIN_CHUNK_CHARS} characters"
            )));
        }

        if self.indexing.overlap >= self.indexing.chunk_size {
            return Err(IndexerError::ConfigError(
                "Overlap must be less than chunk size".to_string(),
            ));
        }

        if self.indexing.batch_size == 0 {
            return Err(IndexerError::ConfigError(
                "Batch size must be non-zero".to_string(),
            ));
        }

        if self.indexing.extensions.is_empty() {
            return Err(IndexerError::ConfigError(
                "At least one file extension is required".to_string(),
            ));
        }

        for pattern in &self.indexing.exclude_patterns {
            Pattern::new(pattern).map_err(|e| {
                IndexerError::ConfigError(format!("Invalid exclude pattern '{pattern}': {e}"))
            })?;
        }

        Ok(())
    }

    /// Log the effective configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Vault root: {:?}", self.vault.root);
        tracing::info!("  Directories: {:?}", self.vault.directories);
        tracing::info!("  State file: {:?}", self.vault.state_path());
        tracing::info!("  Chunk size: {} chars", self.indexing.chunk_size);
        tracing::info!("  Overlap: {} chars", self.indexing.overlap);
        tracing::info!("  Batch size: {} documents", self.indexing.batch_size);
        tracing::info!("  Extensions: {:?}", self.indexing.extensions);
        tracing::info!(
            "  Exclude patterns: {} patterns",
            self.indexing.exclude_patterns.len()
        );
        tracing::info!("  Record policy: {:?}", self.indexing.record_policy);
    }
}
