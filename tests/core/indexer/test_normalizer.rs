// Normalization of whole notes: frontmatter, folder categories and
// content cleaning working together.

use std::path::Path;
use vault_indexer::core::indexer::normalizer::MIN_CONTENT_CHARS;
use vault_indexer::core::indexer::ContentNormalizer;

fn normalizer(directories: &[&str]) -> ContentNormalizer {
    ContentNormalizer::new(
        "/vault",
        directories.iter().map(|d| d.to_string()).collect(),
    )
}

#[test]
fn test_deepest_configured_directory_wins() {
    let normalizer = normalizer(&["Projects", "Projects/ClientA"]);
    let categories =
        normalizer.folder_categories(Path::new("/vault/Projects/ClientA/Sub/doc.md"));

    assert_eq!(categories, vec!["Sub"]);
}

#[test]
fn test_dot_directory_means_vault_root() {
    let normalizer = normalizer(&["."]);
    let categories = normalizer.folder_categories(Path::new("/vault/Area/Topic/doc.md"));

    assert_eq!(categories, vec!["Area", "Topic"]);
}

#[test]
fn test_file_outside_vault_has_no_categories() {
    let normalizer = normalizer(&["Projects"]);
    assert!(normalizer
        .folder_categories(Path::new("/elsewhere/Projects/A/doc.md"))
        .is_empty());
}

#[test]
fn test_frontmatter_only_note_becomes_prose() {
    let normalizer = normalizer(&["Projects"]);
    let document = normalizer
        .normalize(
            "Categories: [[AI]]\nTags: ml\n---\n",
            Path::new("/vault/Projects/doc.md"),
        )
        .unwrap();

    assert!(document.body.is_empty());
    assert_eq!(document.text, "This document covers AI topics. Tags: ml.");
}

#[test]
fn test_note_without_metadata_is_cleaned_body() {
    let normalizer = normalizer(&["Projects"]);
    let content = "# Weekly Review\n\n```dataview\nTABLE file.ctime\n```\n\nRead [the guide](https://example.com/guide) and [[Planning]].\nMore at https://example.com/more";

    let document = normalizer
        .normalize(content, Path::new("/vault/Projects/review.md"))
        .unwrap();

    assert!(document.frontmatter.is_empty());
    assert_eq!(
        document.text,
        "# Weekly Review Read the guide and Planning. More at"
    );
}

#[test]
fn test_whitespace_only_document_is_skipped() {
    let normalizer = normalizer(&["Projects"]);
    let short = "x".repeat(MIN_CONTENT_CHARS - 1);

    assert!(normalizer
        .normalize("   \n\t  ", Path::new("/vault/Projects/a.md"))
        .is_none());
    assert!(normalizer
        .normalize(&format!("  {short}  "), Path::new("/vault/Projects/a.md"))
        .is_none());
}

#[test]
fn test_emoji_and_punctuation_survive_cleaning() {
    let normalizer = normalizer(&["Projects"]);
    let document = normalizer
        .normalize(
            "# Launch 🚀\n\nWe shipped it 🎉 today, \u{201C}finally\u{201D}.",
            Path::new("/vault/Projects/launch.md"),
        )
        .unwrap();

    assert_eq!(
        document.text,
        "# Launch 🚀 We shipped it 🎉 today, \u{201C}finally\u{201D}."
    );
}

#[test]
fn test_diacritics_removed_from_body_and_prose() {
    let normalizer = normalizer(&["Projects"]);
    let document = normalizer
        .normalize(
            "Categories: [[Résumé]]\n---\nNaïve café notes about the Zürich office.",
            Path::new("/vault/Projects/cafe.md"),
        )
        .unwrap();

    assert_eq!(
        document.text,
        "This document covers Resume topics.\n\nNaive cafe notes about the Zurich office."
    );
}

#[test]
fn test_invalid_utf8_bytes_do_not_abort() {
    let normalizer = normalizer(&["Projects"]);
    let mut raw = b"# Notes\n\nValid text ".to_vec();
    raw.extend_from_slice(&[0xff, 0xfe]);
    raw.extend_from_slice(b" continues here.");

    let document = normalizer
        .normalize_bytes(&raw, Path::new("/vault/Projects/bin.md"))
        .unwrap();

    assert!(document.text.starts_with("# Notes Valid text"));
    assert!(document.text.ends_with("continues here."));
}
