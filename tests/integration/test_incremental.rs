// Incremental behaviour across runs: idempotence, change detection
// and recovery from a missing or corrupt state file.

use crate::common::{delivered, open_store, run_recorded, vault_config, TestVault};
use std::collections::HashSet;
use std::fs;

fn three_note_vault() -> TestVault {
    TestVault::with_files(&[
        ("notes/a.md", "# Alpha\n\nFirst note about alpha topics."),
        ("notes/b.md", "# Beta\n\nSecond note about beta topics."),
        ("projects/c.md", "# Gamma\n\nThird note about gamma topics."),
    ])
}

#[tokio::test]
async fn test_first_run_indexes_everything() {
    let vault = three_note_vault();
    let config = vault_config(&vault, &["notes", "projects"], 50);

    let (result, upserter) = run_recorded(&config).await;

    assert_eq!(result.files_seen, 3);
    assert_eq!(result.files_indexed, 3);
    assert_eq!(result.files_updated, 0);
    assert_eq!(result.files_skipped, 0);
    assert_eq!(result.batches_uploaded, 1);
    assert_eq!(upserter.total_documents(), 3);
    assert!(!result.has_errors());
    assert!(config.vault.state_path().exists());
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let vault = three_note_vault();
    let config = vault_config(&vault, &["notes", "projects"], 50);

    run_recorded(&config).await;
    let (second, upserter) = run_recorded(&config).await;

    assert_eq!(second.files_skipped, 3);
    assert_eq!(second.files_indexed, 0);
    assert_eq!(second.files_updated, 0);
    assert_eq!(second.batches_uploaded, 0);
    assert_eq!(upserter.call_count(), 0);
}

#[tokio::test]
async fn test_modified_file_is_updated() {
    let vault = three_note_vault();
    let config = vault_config(&vault, &["notes", "projects"], 50);

    run_recorded(&config).await;
    vault.rewrite("notes/b.md", "# Beta\n\nSecond note, now with new content.");
    let (second, upserter) = run_recorded(&config).await;

    assert_eq!(second.files_updated, 1);
    assert_eq!(second.files_skipped, 2);
    assert_eq!(second.files_indexed, 0);

    let docs = delivered(&upserter);
    assert!(docs.iter().all(|d| d.metadata["filename"] == "b.md"));
    assert!(docs[0].text.contains("new content"));
}

#[tokio::test]
async fn test_touched_file_is_skipped_by_hash() {
    let vault = three_note_vault();
    let config = vault_config(&vault, &["notes", "projects"], 50);

    run_recorded(&config).await;
    vault.touch("notes/a.md", 3600);
    let (second, upserter) = run_recorded(&config).await;

    assert_eq!(second.files_skipped, 3);
    assert_eq!(second.files_updated, 0);
    assert_eq!(upserter.call_count(), 0);
}

#[tokio::test]
async fn test_new_file_is_indexed() {
    let vault = three_note_vault();
    let config = vault_config(&vault, &["notes", "projects"], 50);

    run_recorded(&config).await;
    fs::write(
        vault.file("notes/d.md"),
        "# Delta\n\nA note added after the first run.",
    )
    .unwrap();
    let (second, _) = run_recorded(&config).await;

    assert_eq!(second.files_indexed, 1);
    assert_eq!(second.files_skipped, 3);
}

#[tokio::test]
async fn test_deleted_state_file_forces_full_reindex() {
    let vault = three_note_vault();
    let config = vault_config(&vault, &["notes", "projects"], 50);

    run_recorded(&config).await;
    fs::remove_file(config.vault.state_path()).unwrap();
    let (second, _) = run_recorded(&config).await;

    assert_eq!(second.files_indexed, 3);
}

#[tokio::test]
async fn test_corrupt_state_file_is_not_fatal() {
    let vault = three_note_vault();
    let config = vault_config(&vault, &["notes", "projects"], 50);

    fs::write(config.vault.state_path(), "[[[ not json").unwrap();
    let (result, _) = run_recorded(&config).await;

    assert_eq!(result.files_indexed, 3);
    assert!(!result.has_errors());

    // The corrupt file is replaced by a valid one
    assert_eq!(open_store(&config).len(), 3);
}

#[tokio::test]
async fn test_reindex_reproduces_identical_ids() {
    let vault = TestVault::with_files(&[(
        "notes/long.md",
        &format!(
            "# Intro\n\nShort intro.\n\n# Body\n\n{}",
            "Plenty of words in a long section. ".repeat(120)
        ),
    )]);
    let mut config = vault_config(&vault, &["notes"], 50);
    config.indexing.chunk_size = 500;
    config.indexing.overlap = 50;

    let (_, first) = run_recorded(&config).await;
    fs::remove_file(config.vault.state_path()).unwrap();
    let (_, second) = run_recorded(&config).await;

    let first_docs = delivered(&first);
    let second_docs = delivered(&second);
    assert!(first_docs.len() > 2);

    let first_ids: Vec<&str> = first_docs.iter().map(|d| d.id.as_str()).collect();
    let second_ids: Vec<&str> = second_docs.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(first_ids, second_ids);

    let unique: HashSet<&str> = first_ids.iter().copied().collect();
    assert_eq!(unique.len(), first_ids.len());
}

#[tokio::test]
async fn test_state_file_is_sidecar_compatible() {
    let vault = three_note_vault();
    let config = vault_config(&vault, &["notes", "projects"], 50);

    let (_, upserter) = run_recorded(&config).await;

    let raw = fs::read_to_string(config.vault.state_path()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let key = vault.file("notes/a.md").to_string_lossy().into_owned();
    let entry = &json[key.as_str()];

    assert_eq!(entry["path"], key.as_str());
    assert_eq!(entry["content_hash"].as_str().unwrap().len(), 64);
    assert!(entry["last_modified"].is_string());
    assert!(entry["last_indexed"].is_string());

    let first_id = delivered(&upserter)
        .into_iter()
        .find(|d| d.metadata["filename"] == "a.md")
        .map(|d| d.id)
        .unwrap();
    assert_eq!(entry["document_id"], first_id.as_str());
}
