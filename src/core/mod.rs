//! Core domain logic
//!
//! Everything here is independent of the command-line adapter.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **xdg**: XDG directory handling
//! - **storage**: Persisted per-file change state
//! - **backend**: Upsert capability and its implementations
//! - **indexer**: Walking, normalization, chunking and the pipeline

pub mod backend;
pub mod config;
pub mod error;
pub mod indexer;
pub mod storage;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{IndexerError, Result};
