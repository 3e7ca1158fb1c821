//! Search-backend capability consumed by the indexer.
//!
//! The indexer never talks to a vector store directly. It hands
//! batches of `{id, text, metadata}` documents to an [`Upserter`],
//! which must treat the id as an idempotent key: upserting the same
//! id twice overwrites the earlier document.
//!
//! Implementations:
//!
//! - [`memory::RecordingUpserter`]: records every batch in memory,
//!   with scriptable failures
//! - [`jsonl::JsonlExporter`]: appends documents to a JSON-lines file

pub mod jsonl;
pub mod memory;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::core::types::Chunk;

/// Idempotent batch upsert into a search backend
#[async_trait]
pub trait Upserter: Send + Sync {
    /// Backend name for log messages
    fn name(&self) -> &str;

    /// Insert or overwrite every document, keyed by id
    async fn upsert(&self, documents: &[Chunk]) -> Result<()>;
}

pub use jsonl::JsonlExporter;
pub use memory::RecordingUpserter;
