// Batch grouping, partial failure isolation, record policies and
// cancellation.

use crate::common::{open_store, run_once, run_recorded, vault_config, with_policy, TestVault};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use vault_indexer::core::backend::{RecordingUpserter, Upserter};
use vault_indexer::core::config::RecordPolicy;
use vault_indexer::core::error::Result;
use vault_indexer::core::indexer::IndexingPipeline;
use vault_indexer::core::types::{Chunk, RunError};

#[tokio::test]
async fn test_five_files_batch_of_two() {
    let vault = TestVault::with_notes(5);
    let config = vault_config(&vault, &["notes"], 2);

    let (result, upserter) = run_recorded(&config).await;

    assert_eq!(upserter.call_count(), 3);
    assert_eq!(upserter.batch_sizes(), vec![2, 2, 1]);
    assert_eq!(upserter.total_documents(), 5);
    assert_eq!(result.batches_uploaded, 3);
    assert_eq!(result.documents_uploaded, 5);
}

#[tokio::test]
async fn test_failed_batch_does_not_stop_run() {
    let vault = TestVault::with_notes(5);
    let config = vault_config(&vault, &["notes"], 2);
    let upserter = Arc::new(RecordingUpserter::failing_on([1]));

    let result = run_once(&config, upserter.clone()).await;

    assert_eq!(upserter.call_count(), 3);
    assert_eq!(upserter.total_documents(), 3);
    assert_eq!(result.batches_uploaded, 2);
    assert_eq!(result.files_indexed, 5);
    assert_eq!(result.errors.len(), 1);

    match &result.errors[0] {
        RunError::Batch {
            paths, documents, ..
        } => {
            assert_eq!(*documents, 2);
            assert_eq!(
                paths,
                &vec![
                    vault.file("notes/note_02.md"),
                    vault.file("notes/note_03.md")
                ]
            );
        }
        other => panic!("expected batch error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_confirmed_policy_retries_failed_batch() {
    let vault = TestVault::with_notes(5);
    let config = with_policy(vault_config(&vault, &["notes"], 2), RecordPolicy::Confirmed);

    run_once(&config, Arc::new(RecordingUpserter::failing_on([1]))).await;
    assert_eq!(open_store(&config).len(), 3);

    let (second, upserter) = run_recorded(&config).await;

    assert_eq!(second.files_indexed, 2);
    assert_eq!(second.files_skipped, 3);
    assert_eq!(upserter.total_documents(), 2);
    assert_eq!(open_store(&config).len(), 5);
}

#[tokio::test]
async fn test_optimistic_policy_records_failed_batch() {
    let vault = TestVault::with_notes(5);
    let config = with_policy(
        vault_config(&vault, &["notes"], 2),
        RecordPolicy::Optimistic,
    );

    run_once(&config, Arc::new(RecordingUpserter::failing_on([1]))).await;
    assert_eq!(open_store(&config).len(), 5);

    // Files from the failed batch are considered done
    let (second, upserter) = run_recorded(&config).await;

    assert_eq!(second.files_skipped, 5);
    assert_eq!(upserter.call_count(), 0);
}

#[tokio::test]
async fn test_final_partial_batch_failure_reported() {
    let vault = TestVault::with_notes(3);
    let config = vault_config(&vault, &["notes"], 2);
    let upserter = Arc::new(RecordingUpserter::failing_on([1]));

    let result = run_once(&config, upserter.clone()).await;

    assert_eq!(result.batches_uploaded, 1);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].to_string().contains("note_02.md"));
}

/// Requests cancellation on every call
struct CancellingUpserter {
    cancel: Arc<AtomicBool>,
    inner: RecordingUpserter,
}

#[async_trait]
impl Upserter for CancellingUpserter {
    fn name(&self) -> &str {
        "cancelling"
    }

    async fn upsert(&self, documents: &[Chunk]) -> Result<()> {
        self.cancel.store(true, Ordering::SeqCst);
        self.inner.upsert(documents).await
    }
}

#[tokio::test]
async fn test_cancellation_stops_between_files() {
    let vault = TestVault::with_notes(4);
    let config = vault_config(&vault, &["notes"], 1);
    let cancel = Arc::new(AtomicBool::new(false));
    let upserter = Arc::new(CancellingUpserter {
        cancel: cancel.clone(),
        inner: RecordingUpserter::new(),
    });

    let mut pipeline = IndexingPipeline::new(&config, upserter.clone()).unwrap();
    let mut store = open_store(&config);
    let result = pipeline.run_with_cancel(&mut store, &cancel).await.unwrap();

    assert!(result.cancelled);
    assert_eq!(result.files_seen, 4);
    assert_eq!(result.files_indexed, 1);
    assert_eq!(upserter.inner.total_documents(), 1);

    // The delivered file was persisted, the rest are picked up next time
    assert_eq!(open_store(&config).len(), 1);
}
