//! Storage layer for per-file change state.
//!
//! # Sidecar Structure
//!
//! ```text
//! {vault_root}/.obsidian_index.json
//! {
//!   "notes/a.md": {
//!     "path": "notes/a.md",
//!     "last_modified": "2025-08-18T19:28:00.123456789Z",
//!     "content_hash": "<sha256 hex>",
//!     "document_id": "<first chunk id>",
//!     "last_indexed": "2025-08-18T19:30:00Z"
//!   }
//! }
//! ```

mod change_store;

pub use change_store::{content_hash, modified_time, ChangeStore, FileChange, FileSnapshot};
