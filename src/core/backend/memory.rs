//! In-memory upserter that records every batch.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::Upserter;
use crate::core::error::{IndexerError, Result};
use crate::core::types::Chunk;

/// Records successful batches; calls whose zero-based attempt number
/// is in the failure set return an error instead
#[derive(Debug, Default)]
pub struct RecordingUpserter {
    batches: Mutex<Vec<Vec<Chunk>>>,
    fail_on: HashSet<usize>,
    attempts: AtomicUsize,
}

impl RecordingUpserter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the given call attempts (0 is the first call)
    pub fn failing_on(attempts: impl IntoIterator<Item = usize>) -> Self {
        Self {
            fail_on: attempts.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Upsert calls made, including failed ones
    pub fn call_count(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Successfully recorded batches, in call order
    pub fn batches(&self) -> Vec<Vec<Chunk>> {
        self.batches
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Sizes of successfully recorded batches
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(Vec::len)
            .collect()
    }

    /// Documents across all successful batches
    pub fn total_documents(&self) -> usize {
        self.batch_sizes().iter().sum()
    }
}

#[async_trait]
impl Upserter for RecordingUpserter {
    fn name(&self) -> &str {
        "memory"
    }

    async fn upsert(&self, documents: &[Chunk]) -> Result<()> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);

        if self.fail_on.contains(&attempt) {
            return Err(IndexerError::UpsertFailed(format!(
                "scripted failure on call {attempt}"
            )));
        }

        self.batches
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(documents.to_vec());
        Ok(())
    }
}
