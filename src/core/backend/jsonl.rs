//! JSON-lines exporter.
//!
//! Appends one JSON object per document to a file. Consumers that
//! load the export into a vector store should keep the last line for
//! each id, which gives the same overwrite semantics as an upsert.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use super::Upserter;
use crate::core::error::{IndexerError, Result};
use crate::core::types::Chunk;

/// Upserter writing documents to a JSON-lines file
#[derive(Debug, Clone)]
pub struct JsonlExporter {
    path: PathBuf,
}

impl JsonlExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Upserter for JsonlExporter {
    fn name(&self) -> &str {
        "jsonl"
    }

    async fn upsert(&self, documents: &[Chunk]) -> Result<()> {
        let mut buffer = String::new();
        for document in documents {
            buffer.push_str(&serde_json::to_string(document)?);
            buffer.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                IndexerError::UpsertFailed(format!("Failed to open {}: {e}", self.path.display()))
            })?;

        file.write_all(buffer.as_bytes()).await.map_err(|e| {
            IndexerError::UpsertFailed(format!("Failed to write {}: {e}", self.path.display()))
        })?;
        file.flush().await.map_err(|e| {
            IndexerError::UpsertFailed(format!("Failed to flush {}: {e}", self.path.display()))
        })?;

        Ok(())
    }
}
