//! Persisted per-file change state.
//!
//! The store maps each indexed file path to its last-known
//! [`FileState`]. It is loaded once before a run, mutated in memory
//! by the pipeline, and written back once at the end of the run.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{IndexerError, Result};
use crate::core::types::FileState;

/// Lowercase hex SHA-256 of raw file bytes
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Modification time of a file
pub fn modified_time(path: &Path) -> Result<DateTime<Utc>> {
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| IndexerError::file(path, e))?;
    Ok(DateTime::<Utc>::from(modified))
}

/// A file's modification time and bytes, read once and shared by
/// change detection and processing
#[derive(Debug, Clone)]
pub struct FileSnapshot {
    pub modified: DateTime<Utc>,
    pub bytes: Vec<u8>,

    /// Hex SHA-256 of `bytes`
    pub hash: String,
}

impl FileSnapshot {
    /// Stat and read a file
    ///
    /// # Errors
    ///
    /// Returns a per-file error if the file cannot be stat'ed or read.
    pub fn read(path: &Path) -> Result<Self> {
        let modified = modified_time(path)?;
        let bytes = fs::read(path).map_err(|e| IndexerError::file(path, e))?;
        let hash = content_hash(&bytes);

        Ok(Self {
            modified,
            bytes,
            hash,
        })
    }
}

/// Result of comparing a file on disk with its recorded state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChange {
    /// No state recorded
    New,
    /// Content hash differs
    Modified,
    /// Same bytes, new modification time
    Touched(DateTime<Utc>),
    Unchanged,
}

impl FileChange {
    pub fn needs_processing(&self) -> bool {
        matches!(self, FileChange::New | FileChange::Modified)
    }
}

/// Map of file path to last-known state, optionally backed by a
/// JSON sidecar file
#[derive(Debug, Default)]
pub struct ChangeStore {
    states: BTreeMap<String, FileState>,
    sidecar: Option<PathBuf>,
}

impl ChangeStore {
    /// Load the store from a sidecar file
    ///
    /// A missing file yields an empty store. Unreadable or malformed
    /// content is logged and also yields an empty store, so every
    /// file is re-processed on the next run.
    pub fn open(sidecar: impl Into<PathBuf>) -> Self {
        let sidecar = sidecar.into();

        let states = match fs::read_to_string(&sidecar) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(states) => states,
                Err(e) => {
                    tracing::warn!(
                        "Malformed file index {:?}, starting from empty state: {}",
                        sidecar,
                        e
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No file index at {:?}, starting fresh", sidecar);
                BTreeMap::new()
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to read file index {:?}, starting from empty state: {}",
                    sidecar,
                    e
                );
                BTreeMap::new()
            }
        };

        tracing::debug!("Loaded {} file states from {:?}", states.len(), sidecar);

        Self {
            states,
            sidecar: Some(sidecar),
        }
    }

    /// A store with no sidecar; `flush` is a no-op
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Sidecar path, if the store is file-backed
    pub fn sidecar(&self) -> Option<&Path> {
        self.sidecar.as_deref()
    }

    fn key(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }

    pub fn get(&self, path: &Path) -> Option<&FileState> {
        self.states.get(&Self::key(path))
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.states.contains_key(&Self::key(path))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// All recorded states, ordered by path
    pub fn iter(&self) -> impl Iterator<Item = &FileState> {
        self.states.values()
    }

    /// Classify a file against its recorded state
    ///
    /// A file with recorded state is always read and hashed: a
    /// differing time with identical bytes is a touch, and a matching
    /// time with different bytes is still a modification.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be stat'ed or read.
    pub fn detect_change(&self, path: &Path) -> Result<FileChange> {
        if !self.contains(path) {
            return Ok(FileChange::New);
        }

        let snapshot = FileSnapshot::read(path)?;
        Ok(self.classify(path, &snapshot))
    }

    /// Classify an already-read file against its recorded state
    pub fn classify(&self, path: &Path, snapshot: &FileSnapshot) -> FileChange {
        let Some(state) = self.get(path) else {
            return FileChange::New;
        };

        if snapshot.hash != state.content_hash {
            FileChange::Modified
        } else if snapshot.modified != state.last_modified {
            FileChange::Touched(snapshot.modified)
        } else {
            FileChange::Unchanged
        }
    }

    /// Whether a file must be (re-)processed
    pub fn needs_processing(&self, path: &Path) -> Result<bool> {
        Ok(self.detect_change(path)?.needs_processing())
    }

    /// Move a recorded file's modification time forward without
    /// re-processing it, so the next run sees it as unchanged
    pub fn refresh_modified(&mut self, path: &Path, modified: DateTime<Utc>) {
        if let Some(state) = self.states.get_mut(&Self::key(path)) {
            state.last_modified = modified;
        }
    }

    /// Insert or replace a file's state in memory
    pub fn record(&mut self, state: FileState) {
        self.states.insert(Self::key(&state.path), state);
    }

    /// Write the full map to the sidecar
    ///
    /// The file is written to a temporary sibling and renamed into
    /// place, so readers never observe a partial file.
    pub fn flush(&self) -> Result<()> {
        let Some(sidecar) = &self.sidecar else {
            return Ok(());
        };

        let json = serde_json::to_string_pretty(&self.states)?;

        let mut temp_name = sidecar.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp = PathBuf::from(temp_name);

        fs::write(&temp, json).map_err(|e| {
            IndexerError::StorageError(format!("Failed to write {}: {e}", temp.display()))
        })?;
        fs::rename(&temp, sidecar).map_err(|e| {
            IndexerError::StorageError(format!(
                "Failed to move file index into place at {}: {e}",
                sidecar.display()
            ))
        })?;

        tracing::debug!("Saved {} file states to {:?}", self.states.len(), sidecar);
        Ok(())
    }
}
