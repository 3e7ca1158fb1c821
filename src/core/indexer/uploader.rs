//! Batch accumulation and upload.
//!
//! Chunks are queued one file at a time; a file's chunks always land
//! in the same batch. Once the queue holds at least `batch_size`
//! documents it is sent as one upsert call. Upload failures are
//! returned as data so the caller can keep going.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::backend::Upserter;
use crate::core::error::IndexerError;
use crate::core::types::Chunk;

/// Result of one upsert call
#[derive(Debug)]
pub struct BatchOutcome {
    /// Files that contributed documents, in queue order
    pub paths: Vec<PathBuf>,

    /// Documents in the batch
    pub documents: usize,

    /// Upsert failure, if any
    pub error: Option<IndexerError>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Accumulates chunks and forwards full batches to an [`Upserter`]
pub struct BatchUploader {
    upserter: Arc<dyn Upserter>,
    batch_size: usize,
    pending: Vec<Chunk>,
    pending_paths: Vec<PathBuf>,
}

impl BatchUploader {
    /// Create an uploader
    ///
    /// A `batch_size` of zero is treated as one.
    pub fn new(upserter: Arc<dyn Upserter>, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            upserter,
            batch_size,
            pending: Vec::with_capacity(batch_size),
            pending_paths: Vec::new(),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Documents waiting for the next upload
    pub fn pending_documents(&self) -> usize {
        self.pending.len()
    }

    /// Files with documents waiting for the next upload
    pub fn pending_paths(&self) -> &[PathBuf] {
        &self.pending_paths
    }

    /// Queue a file's chunks, uploading if the batch is now full
    ///
    /// Returns the outcome when an upload was attempted.
    pub async fn add(&mut self, path: &Path, chunks: Vec<Chunk>) -> Option<BatchOutcome> {
        if chunks.is_empty() {
            return None;
        }

        self.pending.extend(chunks);
        self.pending_paths.push(path.to_path_buf());

        if self.pending.len() >= self.batch_size {
            Some(self.send().await)
        } else {
            None
        }
    }

    /// Upload whatever is still queued
    ///
    /// Returns `None` when nothing was pending.
    pub async fn flush(&mut self) -> Option<BatchOutcome> {
        if self.pending.is_empty() {
            return None;
        }

        Some(self.send().await)
    }

    async fn send(&mut self) -> BatchOutcome {
        let documents = std::mem::take(&mut self.pending);
        let paths = std::mem::take(&mut self.pending_paths);

        let error = match self.upserter.upsert(&documents).await {
            Ok(()) => {
                tracing::info!(
                    "Upserted batch of {} documents from {} files to {}",
                    documents.len(),
                    paths.len(),
                    self.upserter.name()
                );
                None
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to upsert batch of {} documents from {:?}: {}",
                    documents.len(),
                    paths,
                    e
                );
                Some(e)
            }
        };

        BatchOutcome {
            paths,
            documents: documents.len(),
            error,
        }
    }
}
