//! Vault Indexer - Incremental Chunking for Markdown Vaults
//!
//! Walks a vault of markdown notes, turns new and modified notes into
//! identity-stable chunks enriched with frontmatter and folder
//! categories, and upserts them in batches into a search backend.
//! Unchanged notes are skipped using a persisted change-state file.
//!
//! # Architecture
//!
//! The codebase is organized into two main modules:
//!
//! - **core**: Domain logic
//!   - config, error, types, xdg
//!   - storage (change-state sidecar)
//!   - backend (upsert capability, in-memory and JSON-lines)
//!   - indexer (walker, normalizer, chunker, uploader, pipeline)
//!
//! - **cli**: Command-line adapter (depends on core)
//!   - index, status, show-config
//!
//! # Key Features
//!
//! - UTF-8 safe chunking (character-based, never panics)
//! - Deterministic chunk ids (path + position, not content)
//! - Two-tier change detection (mtime, then SHA-256)
//! - Continue-on-error batch uploads with confirmed state records

// Core domain logic
pub mod core;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::backend::Upserter;
pub use core::config::Config;
pub use core::error::{IndexerError, Result};
pub use core::indexer::IndexingPipeline;
pub use core::storage::ChangeStore;
pub use core::types::*;
