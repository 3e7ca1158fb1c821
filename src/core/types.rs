//! Core data types for the vault indexer.
//!
//! This module defines the persisted per-file state, the chunks
//! handed to the search backend and the per-run report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Chunk metadata as sent to the search backend
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// How a chunk was produced by the chunker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    /// A whole header section that fit within the target size
    Header,
    /// A piece of an oversized header section
    SubHeader,
    /// A piece of the size-based fallback split
    Size,
}

impl ChunkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkKind::Header => "header",
            ChunkKind::SubHeader => "sub_header",
            ChunkKind::Size => "size",
        }
    }
}

impl fmt::Display for ChunkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single chunk of a document, ready for upsert
///
/// The `{id, text, metadata}` triple is exactly what the upsert
/// capability accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Stable identifier derived from file path and chunk index
    pub id: String,

    /// Normalized chunk text
    pub text: String,

    /// Source path, file name, folder, chunk index and kind, plus
    /// file-level and frontmatter fields merged in by the pipeline
    pub metadata: Metadata,
}

impl Chunk {
    /// Numeric chunk index stored in metadata
    pub fn chunk_index(&self) -> Option<u64> {
        self.metadata.get("chunk_index").and_then(|v| v.as_u64())
    }

    /// Chunk kind stored in metadata
    pub fn kind(&self) -> Option<&str> {
        self.metadata.get("chunk_type").and_then(|v| v.as_str())
    }
}

/// Last-known state of an indexed file
///
/// Serialized field names match the sidecar format written by
/// earlier versions of the indexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileState {
    /// File path as discovered under the vault root
    pub path: PathBuf,

    /// Modification time at last successful processing
    pub last_modified: DateTime<Utc>,

    /// Lowercase hex SHA-256 of the raw file bytes
    pub content_hash: String,

    /// Id of the file's first chunk (diagnostics only)
    #[serde(rename = "document_id")]
    pub chunk_tracking_id: String,

    /// When the file was last processed
    #[serde(rename = "last_indexed")]
    pub last_indexed_at: DateTime<Utc>,
}

/// An error captured during a run without aborting it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunError {
    /// Stat, read or chunk failure for one file
    File { path: PathBuf, message: String },

    /// Upsert failure for one batch
    Batch {
        paths: Vec<PathBuf>,
        documents: usize,
        message: String,
    },

    /// Failure to write the change-state sidecar
    Persist { message: String },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::File { path, message } => {
                write!(f, "failed to process file {}: {message}", path.display())
            }
            RunError::Batch {
                paths,
                documents,
                message,
            } => {
                let names: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
                write!(
                    f,
                    "failed to upsert batch of {documents} documents from files [{}]: {message}",
                    names.join(", ")
                )
            }
            RunError::Persist { message } => write!(f, "failed to save file index: {message}"),
        }
    }
}

/// Outcome of one incremental indexing pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    /// Files discovered under the configured directories
    pub files_seen: usize,

    /// Files processed that had no prior state
    pub files_indexed: usize,

    /// Files processed that replaced prior state
    pub files_updated: usize,

    /// Files change detection found unchanged
    pub files_skipped: usize,

    /// Files that yielded no content
    pub files_empty: usize,

    /// Successful upsert calls
    pub batches_uploaded: usize,

    /// Documents delivered by successful upsert calls
    pub documents_uploaded: usize,

    /// Whether the run stopped early on request
    pub cancelled: bool,

    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,

    /// File, batch and persistence errors, in occurrence order
    pub errors: Vec<RunError>,
}

impl RunResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Files sent to the backend this run
    pub fn files_processed(&self) -> usize {
        self.files_indexed + self.files_updated
    }
}
