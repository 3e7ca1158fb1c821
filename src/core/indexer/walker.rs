//! Vault walker with extension and pattern-based filtering.
//!
//! Enumerates candidate documents under each configured
//! subdirectory of the vault root. Missing subdirectories are
//! skipped; any other traversal failure aborts discovery.

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::error::{IndexerError, Result};

/// Vault walker filtering by extension and exclude patterns
pub struct PathWalker {
    /// Lowercased extensions to include (e.g., "md")
    extensions: Vec<String>,

    /// Patterns to exclude (e.g., "**/templates/**")
    exclude_patterns: Vec<Pattern>,
}

impl PathWalker {
    /// Create a new walker
    ///
    /// # Arguments
    ///
    /// * `extensions` - File extensions to include, with or without
    ///   a leading dot
    /// * `exclude_patterns` - Glob patterns for paths to exclude
    ///
    /// # Returns
    ///
    /// A new `PathWalker` or an error if a pattern is invalid
    pub fn new(extensions: Vec<String>, exclude_patterns: Vec<String>) -> Result<Self> {
        let exclude = exclude_patterns
            .into_iter()
            .map(|p| {
                Pattern::new(&p).map_err(|e| {
                    IndexerError::ConfigError(format!("Invalid exclude pattern '{p}': {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let extensions = extensions
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .collect();

        Ok(Self {
            extensions,
            exclude_patterns: exclude,
        })
    }

    /// Collect all matching files under the named subdirectories
    ///
    /// Directories are visited in the order given; within each,
    /// entries are visited in file-name order so repeated calls
    /// return the same sequence.
    ///
    /// # Arguments
    ///
    /// * `root` - Vault root directory
    /// * `directories` - Subdirectory names relative to `root`
    pub fn collect_files(&self, root: &Path, directories: &[String]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for dir in directories {
            let dir_path = root.join(dir);
            if !dir_path.exists() {
                tracing::warn!("Directory {:?} does not exist, skipping", dir_path);
                continue;
            }

            self.collect_dir(&dir_path, &mut files)?;
        }

        Ok(files)
    }

    fn collect_dir(&self, dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
        for entry in WalkDir::new(dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| self.should_process_entry(e, dir))
        {
            let entry = entry.map_err(|e| {
                IndexerError::DiscoveryFailed(format!("Failed to walk directory {dir:?}: {e}"))
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if self.matches_extension(path) && !self.is_excluded(path) {
                files.push(path.to_path_buf());
            }
        }

        Ok(())
    }

    /// Filters out hidden and excluded directories. Never filters
    /// the walk root itself.
    fn should_process_entry(&self, entry: &DirEntry, root: &Path) -> bool {
        let path = entry.path();

        if path == root || !entry.file_type().is_dir() {
            return true;
        }

        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.starts_with('.') {
                return false;
            }
        }

        if self.is_excluded(path) {
            tracing::debug!("Skipping excluded directory: {:?}", path);
            return false;
        }

        true
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                let ext = e.to_lowercase();
                self.extensions.iter().any(|allowed| *allowed == ext)
            })
            .unwrap_or(false)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let path_str = match path.to_str() {
            Some(s) => s,
            None => return false,
        };

        self.exclude_patterns
            .iter()
            .any(|p| p.matches(path_str) || p.matches_path(path))
    }
}
