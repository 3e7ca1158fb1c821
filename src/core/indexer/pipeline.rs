//! Incremental indexing pipeline.
//!
//! Drives one pass over the vault:
//! 1. Walk the configured directories
//! 2. Skip files the change store reports as unchanged
//! 3. Read, hash, normalize and chunk the rest
//! 4. Queue chunks and upload full batches
//! 5. Upload the final partial batch
//! 6. Persist the change store
//!
//! Only discovery failures abort a run. File, batch and persistence
//! failures are captured in the [`RunResult`].

use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::core::backend::Upserter;
use crate::core::config::{Config, RecordPolicy};
use crate::core::error::{IndexerError, Result};
use crate::core::indexer::uploader::BatchOutcome;
use crate::core::indexer::{BatchUploader, Chunker, ContentNormalizer, PathWalker};
use crate::core::storage::{ChangeStore, FileChange, FileSnapshot};
use crate::core::types::{Chunk, FileState, RunError, RunResult};

/// A file turned into upload-ready chunks
#[derive(Debug, Clone)]
pub struct ProcessedFile {
    /// State to record once the chunks are delivered
    pub state: FileState,

    /// Non-empty chunks with file-level and frontmatter metadata
    pub chunks: Vec<Chunk>,
}

/// Orchestrates incremental indexing runs
pub struct IndexingPipeline {
    vault_root: PathBuf,
    directories: Vec<String>,
    walker: PathWalker,
    normalizer: ContentNormalizer,
    chunker: Chunker,
    uploader: BatchUploader,
    record_policy: RecordPolicy,
}

impl IndexingPipeline {
    /// Create a pipeline from validated configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Vault layout and indexing settings
    /// * `upserter` - Search backend receiving the chunks
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` fails validation.
    pub fn new(config: &Config, upserter: Arc<dyn Upserter>) -> Result<Self> {
        config.validate()?;

        let walker = PathWalker::new(
            config.indexing.extensions.clone(),
            config.indexing.exclude_patterns.clone(),
        )?;
        let normalizer =
            ContentNormalizer::new(config.vault.root.clone(), config.vault.directories.clone());
        let chunker = Chunker::new(config.indexing.chunk_size, config.indexing.overlap);
        let uploader = BatchUploader::new(upserter, config.indexing.batch_size);

        Ok(Self {
            vault_root: config.vault.root.clone(),
            directories: config.vault.directories.clone(),
            walker,
            normalizer,
            chunker,
            uploader,
            record_policy: config.indexing.record_policy,
        })
    }

    /// Run one incremental pass
    pub async fn run(&mut self, store: &mut ChangeStore) -> Result<RunResult> {
        let never = AtomicBool::new(false);
        self.run_with_cancel(store, &never).await
    }

    /// Run one incremental pass, stopping between files once
    /// `cancel` is set
    ///
    /// A cancelled run still uploads its pending batch and persists
    /// the store, so recorded state matches what was delivered.
    ///
    /// # Errors
    ///
    /// Returns an error only if file discovery fails.
    pub async fn run_with_cancel(
        &mut self,
        store: &mut ChangeStore,
        cancel: &AtomicBool,
    ) -> Result<RunResult> {
        let start = Instant::now();
        let mut result = RunResult::default();

        tracing::info!(
            "Starting incremental index of {:?} (directories: {:?})",
            self.vault_root,
            self.directories
        );
        let files = self
            .walker
            .collect_files(&self.vault_root, &self.directories)?;
        result.files_seen = files.len();
        tracing::info!("Found {} candidate files", files.len());

        // Confirmed policy: states wait here until their batch lands
        let mut staged: HashMap<PathBuf, FileState> = HashMap::new();

        for (idx, path) in files.iter().enumerate() {
            if cancel.load(Ordering::SeqCst) {
                tracing::warn!(
                    "Cancellation requested, stopping after {}/{} files",
                    idx,
                    files.len()
                );
                result.cancelled = true;
                break;
            }

            if idx % 100 == 0 && idx > 0 {
                tracing::info!("Progress: {}/{} files checked", idx, files.len());
            }

            let snapshot = match FileSnapshot::read(path) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    capture_file_error(&mut result, path, e);
                    continue;
                }
            };

            match store.classify(path, &snapshot) {
                FileChange::New | FileChange::Modified => {}
                FileChange::Touched(modified) => {
                    tracing::debug!("Touched but unchanged, skipping {:?}", path);
                    store.refresh_modified(path, modified);
                    result.files_skipped += 1;
                    continue;
                }
                FileChange::Unchanged => {
                    tracing::debug!("Unchanged, skipping {:?}", path);
                    result.files_skipped += 1;
                    continue;
                }
            }

            let processed = match self.process_snapshot(path, snapshot) {
                Ok(Some(processed)) => processed,
                Ok(None) => {
                    tracing::debug!("No content in {:?}", path);
                    result.files_empty += 1;
                    continue;
                }
                Err(e) => {
                    capture_file_error(&mut result, path, e);
                    continue;
                }
            };

            if store.contains(path) {
                result.files_updated += 1;
            } else {
                result.files_indexed += 1;
            }

            let ProcessedFile { state, chunks } = processed;
            tracing::debug!("Queued {:?} ({} chunks)", path, chunks.len());

            match self.record_policy {
                RecordPolicy::Optimistic => store.record(state),
                RecordPolicy::Confirmed => {
                    staged.insert(path.clone(), state);
                }
            }

            if let Some(outcome) = self.uploader.add(path, chunks).await {
                settle_batch(outcome, store, &mut staged, &mut result);
            }
        }

        if let Some(outcome) = self.uploader.flush().await {
            settle_batch(outcome, store, &mut staged, &mut result);
        }

        if let Err(e) = store.flush() {
            tracing::warn!("Failed to save file index: {}", e);
            result.errors.push(RunError::Persist {
                message: e.to_string(),
            });
        }

        result.duration_ms = start.elapsed().as_millis() as u64;
        log_summary(&result);

        Ok(result)
    }

    /// Read, hash, normalize and chunk one file
    ///
    /// Returns `None` when the file has no indexable content.
    pub fn process_file(&self, path: &Path) -> Result<Option<ProcessedFile>> {
        self.process_snapshot(path, FileSnapshot::read(path)?)
    }

    /// Normalize and chunk a file that has already been read
    fn process_snapshot(
        &self,
        path: &Path,
        snapshot: FileSnapshot,
    ) -> Result<Option<ProcessedFile>> {
        let FileSnapshot {
            modified: last_modified,
            bytes,
            hash,
        } = snapshot;

        let Some(document) = self.normalizer.normalize_bytes(&bytes, path) else {
            return Ok(None);
        };

        let mut chunks: Vec<Chunk> = self
            .chunker
            .chunk(&document.text, path)
            .into_iter()
            .filter(|c| !c.text.trim().is_empty())
            .collect();

        let Some(first) = chunks.first() else {
            return Ok(None);
        };
        let chunk_tracking_id = first.id.clone();

        let frontmatter = document.frontmatter.to_metadata();
        for chunk in &mut chunks {
            chunk.metadata.insert(
                "last_modified".to_string(),
                Value::from(last_modified.timestamp()),
            );
            chunk
                .metadata
                .insert("content_hash".to_string(), Value::from(hash.as_str()));
            for (key, value) in &frontmatter {
                chunk.metadata.insert(key.clone(), value.clone());
            }
        }

        Ok(Some(ProcessedFile {
            state: FileState {
                path: path.to_path_buf(),
                last_modified,
                content_hash: hash,
                chunk_tracking_id,
                last_indexed_at: Utc::now(),
            },
            chunks,
        }))
    }
}

fn capture_file_error(result: &mut RunResult, path: &Path, error: IndexerError) {
    tracing::warn!("Failed to process {:?}: {}", path, error);

    // The path is carried separately, keep only the cause
    let message = match error {
        IndexerError::FileFailed { message, .. } => message,
        other => other.to_string(),
    };
    result.errors.push(RunError::File {
        path: path.to_path_buf(),
        message,
    });
}

/// Count an upload and commit (or drop) the staged states of the
/// files it carried
fn settle_batch(
    outcome: BatchOutcome,
    store: &mut ChangeStore,
    staged: &mut HashMap<PathBuf, FileState>,
    result: &mut RunResult,
) {
    match outcome.error {
        None => {
            result.batches_uploaded += 1;
            result.documents_uploaded += outcome.documents;
            for path in &outcome.paths {
                if let Some(state) = staged.remove(path) {
                    store.record(state);
                }
            }
        }
        Some(e) => {
            for path in &outcome.paths {
                staged.remove(path);
            }
            result.errors.push(RunError::Batch {
                paths: outcome.paths,
                documents: outcome.documents,
                message: e.to_string(),
            });
        }
    }
}

fn log_summary(result: &RunResult) {
    tracing::info!(
        "Indexing complete. Seen: {}, New: {}, Updated: {}, Skipped: {}, Empty: {}, \
         Batches: {}, Documents: {}, Errors: {} in {}ms",
        result.files_seen,
        result.files_indexed,
        result.files_updated,
        result.files_skipped,
        result.files_empty,
        result.batches_uploaded,
        result.documents_uploaded,
        result.errors.len(),
        result.duration_ms
    );

    for (i, error) in result.errors.iter().enumerate() {
        tracing::warn!("  {}. {}", i + 1, error);
    }
}
