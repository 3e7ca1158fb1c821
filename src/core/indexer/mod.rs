//! Document indexing module.
//!
//! Turns a vault of markdown notes into upload-ready chunks and
//! keeps the search backend in sync with it. Key features:
//!
//! - Deterministic vault walking with extension and glob filtering
//! - Frontmatter and folder-derived category extraction
//! - Header-aware, character-based chunking with overlap
//! - Batched, continue-on-error uploads
//! - Incremental runs driven by a persisted change store

pub mod chunker;
pub mod normalizer;
pub mod pipeline;
pub mod uploader;
pub mod walker;

pub use chunker::Chunker;
pub use normalizer::ContentNormalizer;
pub use pipeline::{IndexingPipeline, ProcessedFile};
pub use uploader::{BatchOutcome, BatchUploader};
pub use walker::PathWalker;
