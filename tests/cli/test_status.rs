//! Tests for the status CLI command

use crate::cli::test_helpers::{index_args, output_path, status_args};
use crate::common::TestVault;
use vault_indexer::cli::commands::{index, status};
use vault_indexer::cli::OutputFormat;
use vault_indexer::core::config::Config;

/// Test status of a vault that was never indexed
#[tokio::test]
async fn test_status_before_first_run() {
    let vault = TestVault::with_notes(2);

    let result = status::execute(status_args(&vault, false), Config::default(), OutputFormat::Human).await;
    assert!(result.is_ok(), "Status should succeed: {:?}", result.err());

    // Status is read-only
    assert!(!vault.file(".obsidian_index.json").exists());
}

/// Test verbose JSON status after a run
#[tokio::test]
async fn test_status_after_run_json() {
    let vault = TestVault::with_notes(2);
    let output = output_path(&vault);

    index::execute(index_args(&vault, &output), Config::default(), OutputFormat::Json)
        .await
        .unwrap();

    let result = status::execute(status_args(&vault, true), Config::default(), OutputFormat::Json).await;
    assert!(result.is_ok(), "Status JSON should succeed: {:?}", result.err());
}

/// Test status with no directories to check
#[tokio::test]
async fn test_status_rejects_empty_directories() {
    let vault = TestVault::with_notes(1);
    let mut config = Config::default();
    config.vault.directories.clear();

    let mut args = status_args(&vault, false);
    args.directories.clear();

    let result = status::execute(args, config, OutputFormat::Human).await;
    assert!(result.is_err());
}
