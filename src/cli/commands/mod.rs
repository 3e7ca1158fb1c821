//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a specific CLI command.

pub mod config;
pub mod index;
pub mod status;

// Re-export argument types for use in mod.rs
pub use config::ConfigArgs;
pub use index::IndexArgs;
pub use status::StatusArgs;

use crate::core::config::Config;
use std::path::PathBuf;

/// Apply `--vault` and `--dir` overrides shared by several commands
pub(crate) fn apply_vault_overrides(
    config: &mut Config,
    vault: Option<PathBuf>,
    directories: Vec<String>,
) {
    if let Some(root) = vault {
        config.vault.root = root;
    }
    if !directories.is_empty() {
        config.vault.directories = directories;
    }
}
