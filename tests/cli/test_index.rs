//! Tests for the index CLI command
//!
//! Tests the index command handler:
//! - First and repeated runs against the same vault
//! - Chunking and batching overrides
//! - Error cases (missing vault, invalid overrides)

use crate::cli::test_helpers::{index_args, output_path, read_exported};
use crate::common::TestVault;
use vault_indexer::cli::commands::index::execute;
use vault_indexer::cli::OutputFormat;
use vault_indexer::core::config::Config;
use vault_indexer::core::storage::ChangeStore;

/// Test indexing a fresh vault
#[tokio::test]
async fn test_index_new_vault_human() {
    let vault = TestVault::with_notes(3);
    let output = output_path(&vault);

    let result = execute(index_args(&vault, &output), Config::default(), OutputFormat::Human).await;
    assert!(result.is_ok(), "Index should succeed: {:?}", result.err());

    assert_eq!(read_exported(&output).len(), 3);
    assert_eq!(ChangeStore::open(vault.file(".obsidian_index.json")).len(), 3);
}

/// Test indexing a fresh vault (JSON format)
#[tokio::test]
async fn test_index_new_vault_json() {
    let vault = TestVault::with_notes(2);
    let output = output_path(&vault);

    let result = execute(index_args(&vault, &output), Config::default(), OutputFormat::Json).await;
    assert!(result.is_ok(), "Index JSON should succeed: {:?}", result.err());
    assert_eq!(read_exported(&output).len(), 2);
}

/// Test that a second run exports nothing new
#[tokio::test]
async fn test_index_second_run_appends_nothing() {
    let vault = TestVault::with_notes(3);
    let output = output_path(&vault);

    execute(index_args(&vault, &output), Config::default(), OutputFormat::Human)
        .await
        .unwrap();
    execute(index_args(&vault, &output), Config::default(), OutputFormat::Human)
        .await
        .unwrap();

    assert_eq!(read_exported(&output).len(), 3);
}

/// Test that a smaller chunk size produces more chunks
#[tokio::test]
async fn test_index_chunk_size_override() {
    let body = "A sentence about strategy and planning. ".repeat(40);
    let vault = TestVault::with_files(&[("notes/long.md", &format!("# Long\n\n{body}"))]);
    let output = output_path(&vault);

    let mut args = index_args(&vault, &output);
    args.chunk_size = Some(400);
    args.overlap = Some(40);

    execute(args, Config::default(), OutputFormat::Human)
        .await
        .unwrap();

    let chunks = read_exported(&output);
    assert!(chunks.len() > 3);
    assert!(chunks.iter().all(|c| c.kind() == Some("sub_header")));
}

/// Test that --optimistic still exports and records everything
#[tokio::test]
async fn test_index_optimistic_flag() {
    let vault = TestVault::with_notes(2);
    let output = output_path(&vault);

    let mut args = index_args(&vault, &output);
    args.optimistic = true;
    args.batch_size = Some(1);

    execute(args, Config::default(), OutputFormat::Json)
        .await
        .unwrap();

    assert_eq!(read_exported(&output).len(), 2);
    assert_eq!(ChangeStore::open(vault.file(".obsidian_index.json")).len(), 2);
}

/// Test indexing a vault root that does not exist
#[tokio::test]
async fn test_index_missing_vault_root() {
    let vault = TestVault::with_notes(1);
    let output = output_path(&vault);

    let mut args = index_args(&vault, &output);
    args.vault = Some(vault.file("does-not-exist"));

    let result = execute(args, Config::default(), OutputFormat::Human).await;
    let err = result.unwrap_err();
    assert!(err.to_string().contains("not a directory"));
    assert!(!output.exists());
}

/// Test that an overlap at least as large as the chunk size is rejected
#[tokio::test]
async fn test_index_invalid_overlap() {
    let vault = TestVault::with_notes(1);
    let output = output_path(&vault);

    let mut args = index_args(&vault, &output);
    args.chunk_size = Some(100);
    args.overlap = Some(100);

    let result = execute(args, Config::default(), OutputFormat::Human).await;
    assert!(result.is_err());
    assert!(!vault.file(".obsidian_index.json").exists());
}
