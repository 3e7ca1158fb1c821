//! Content normalization applied to every document before chunking.
//!
//! A note goes through four steps:
//!
//! 1. Frontmatter extraction (created date, `[[category]]` links,
//!    comma-separated tags) from a block ended by a `---` line
//! 2. Folder-derived categories from the directories between a
//!    configured vault subdirectory and the file
//! 3. A short prose summary of the fused categories and tags,
//!    prepended to the body so it is embedded with the text
//! 4. Noise stripping: query blocks, YAML blocks, link syntax,
//!    bare URLs, whitespace runs and diacritics
//!
//! # Example
//!
//! ```
//! use vault_indexer::core::indexer::normalizer::{clean_content, normalize_unicode};
//!
//! assert_eq!(normalize_unicode("café naïve"), "cafe naive");
//! assert_eq!(clean_content("See [[Strategy]] at https://x.io"), "See Strategy at");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};
use unicode_general_category::{get_general_category, GeneralCategory};
use unicode_normalization::UnicodeNormalization;

use crate::core::types::Metadata;

/// Documents shorter than this (in characters, after trimming) carry
/// no content worth indexing
pub const MIN_CONTENT_CHARS: usize = 10;

/// Line that ends a frontmatter block
const FRONTMATTER_SEPARATOR: &str = "---";

static QUERY_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```dataview.*?```").expect("query block regex"));

static YAML_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\A---.*?---\s*").expect("yaml block regex"));

static MARKDOWN_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").expect("markdown link regex"));

static WIKI_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\]]+)\]\]").expect("wiki link regex"));

static BARE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://[^\s)]+").expect("url regex"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

static CREATED_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").expect("created date regex"));

/// Structured fields parsed from a note's frontmatter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    /// Bare numeric first line, e.g. `202508181928`
    pub created_date: Option<String>,

    /// Category names in order of occurrence
    pub categories: Vec<String>,

    pub tags: Vec<String>,
}

impl Frontmatter {
    pub fn is_empty(&self) -> bool {
        self.created_date.is_none() && self.categories.is_empty() && self.tags.is_empty()
    }

    /// Render categories and tags as natural-language sentences
    ///
    /// ```
    /// use vault_indexer::core::indexer::normalizer::Frontmatter;
    ///
    /// let fm = Frontmatter {
    ///     created_date: None,
    ///     categories: vec!["AI".into(), "Ops".into(), "Cloud".into()],
    ///     tags: vec!["infra".into()],
    /// };
    /// assert_eq!(
    ///     fm.to_prose(),
    ///     "This document covers AI, Ops, and Cloud topics. Tags: infra."
    /// );
    /// ```
    pub fn to_prose(&self) -> String {
        let mut parts = Vec::new();

        match self.categories.as_slice() {
            [] => {}
            [only] => parts.push(format!("This document covers {only} topics.")),
            [first, second] => {
                parts.push(format!("This document covers {first} and {second} topics."))
            }
            [init @ .., last] => parts.push(format!(
                "This document covers {}, and {last} topics.",
                init.join(", ")
            )),
        }

        if !self.tags.is_empty() {
            parts.push(format!("Tags: {}.", self.tags.join(", ")));
        }

        parts.join(" ")
    }

    /// Flatten into backend metadata; lists become `", "`-joined strings
    pub fn to_metadata(&self) -> Metadata {
        let mut metadata = Metadata::new();

        if let Some(date) = &self.created_date {
            metadata.insert("created_date".to_string(), Value::from(date.as_str()));
        }
        if !self.categories.is_empty() {
            metadata.insert(
                "categories".to_string(),
                Value::from(self.categories.join(", ")),
            );
        }
        if !self.tags.is_empty() {
            metadata.insert("tags".to_string(), Value::from(self.tags.join(", ")));
        }

        metadata
    }
}

/// A document ready for chunking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDocument {
    /// Frontmatter with folder categories fused in
    pub frontmatter: Frontmatter,

    /// Cleaned body text
    pub body: String,

    /// Prose summary (if any), a blank line, then the cleaned body
    pub text: String,
}

/// Per-vault content normalizer
#[derive(Debug, Clone)]
pub struct ContentNormalizer {
    vault_root: PathBuf,
    directories: Vec<String>,
}

impl ContentNormalizer {
    /// Create a normalizer for a vault
    ///
    /// # Arguments
    ///
    /// * `vault_root` - Vault root directory
    /// * `directories` - Configured subdirectories; folders below
    ///   them become categories
    pub fn new(vault_root: impl Into<PathBuf>, directories: Vec<String>) -> Self {
        Self {
            vault_root: vault_root.into(),
            directories,
        }
    }

    /// Normalize raw file bytes
    ///
    /// Invalid UTF-8 is replaced rather than rejected. Returns `None`
    /// when the document is too short to carry content.
    pub fn normalize_bytes(&self, raw: &[u8], path: &Path) -> Option<NormalizedDocument> {
        let text: Cow<'_, str> = String::from_utf8_lossy(raw);
        self.normalize(&text, path)
    }

    /// Normalize document text
    ///
    /// Returns `None` when the trimmed document has fewer than
    /// [`MIN_CONTENT_CHARS`] characters.
    pub fn normalize(&self, content: &str, path: &Path) -> Option<NormalizedDocument> {
        if content.trim().chars().count() < MIN_CONTENT_CHARS {
            return None;
        }

        let (mut frontmatter, body) = extract_frontmatter(content);

        let folder_categories = self.folder_categories(path);
        frontmatter.categories.extend(folder_categories);

        let prose = normalize_unicode(&frontmatter.to_prose());
        let body = clean_content(&body);

        let text = match (prose.is_empty(), body.is_empty()) {
            (false, false) => format!("{prose}\n\n{body}"),
            (false, true) => prose,
            _ => body.clone(),
        };

        Some(NormalizedDocument {
            frontmatter,
            body,
            text,
        })
    }

    /// Every directory strictly between a configured subdirectory and
    /// the file, outermost first
    ///
    /// Files directly inside a configured subdirectory, or outside
    /// all of them, yield no categories. When several configured
    /// subdirectories contain the file the deepest one wins.
    pub fn folder_categories(&self, path: &Path) -> Vec<String> {
        let Some(relative) = relative_to(&self.vault_root, path) else {
            return Vec::new();
        };

        let parts = normal_components(&relative);
        if parts.len() < 2 {
            return Vec::new();
        }
        let folders = &parts[..parts.len() - 1];

        let matched = self
            .directories
            .iter()
            .map(|dir| normal_components(Path::new(dir)))
            .filter(|root| {
                root.len() <= folders.len()
                    && root
                        .iter()
                        .zip(folders)
                        .all(|(a, b)| a.to_lowercase() == b.to_lowercase())
            })
            .map(|root| root.len())
            .max();

        match matched {
            Some(depth) => folders[depth..].to_vec(),
            None => Vec::new(),
        }
    }
}

/// Split a note into frontmatter and body
///
/// Frontmatter is only recognized when a line consisting of `---`
/// exists; without it the whole note is body text.
pub fn extract_frontmatter(content: &str) -> (Frontmatter, String) {
    let mut frontmatter = Frontmatter::default();

    let lines: Vec<&str> = content.split('\n').collect();
    let Some(separator) = lines
        .iter()
        .position(|line| line.trim() == FRONTMATTER_SEPARATOR)
    else {
        return (frontmatter, content.to_string());
    };

    for (i, line) in lines[..separator].iter().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if i == 0 && CREATED_DATE.is_match(line) {
            frontmatter.created_date = Some(line.to_string());
            continue;
        }

        if let Some((key, value)) = line.split_once(':') {
            match key.trim().to_lowercase().as_str() {
                "categories" => {
                    let categories = parse_categories(value);
                    if !categories.is_empty() {
                        frontmatter.categories = categories;
                    }
                }
                "tags" => {
                    let tags = parse_tags(value);
                    if !tags.is_empty() {
                        frontmatter.tags = tags;
                    }
                }
                _ => {}
            }
        }
    }

    let body = lines[separator + 1..].join("\n").trim().to_string();

    (frontmatter, body)
}

/// Every `[[Category]]` in a frontmatter value, in order
pub fn parse_categories(value: &str) -> Vec<String> {
    WIKI_LINK
        .captures_iter(value)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|c| !c.is_empty())
        .collect()
}

/// Comma-separated tags, trimmed, empties dropped
pub fn parse_tags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strip structural noise so only prose reaches the embedder
///
/// Order matters: bracket-paren links are rewritten before bare URLs
/// are removed, so link text survives.
pub fn clean_content(content: &str) -> String {
    let content = QUERY_BLOCK.replace_all(content, "");
    let content = YAML_BLOCK.replace_all(&content, "");
    let content = MARKDOWN_LINK.replace_all(&content, "$1");
    let content = WIKI_LINK.replace_all(&content, "$1");
    let content = BARE_URL.replace_all(&content, "");
    let content = WHITESPACE.replace_all(&content, " ");

    normalize_unicode(content.trim())
}

/// Remove diacritics: decompose, drop nonspacing marks, recompose
///
/// Spacing marks (Mc) such as Indic vowel signs are part of the
/// letter and are kept.
pub fn normalize_unicode(text: &str) -> String {
    text.nfd()
        .filter(|&c| get_general_category(c) != GeneralCategory::NonspacingMark)
        .nfc()
        .collect()
}

fn normal_components(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// Lexical path of `path` below `root`, falling back to absolute
/// forms when one side is relative and the other is not
fn relative_to(root: &Path, path: &Path) -> Option<PathBuf> {
    let root_clean: PathBuf = root
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let path_clean: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    if let Ok(rel) = path_clean.strip_prefix(&root_clean) {
        return Some(rel.to_path_buf());
    }

    let root_abs = std::path::absolute(root).ok()?;
    let path_abs = std::path::absolute(path).ok()?;
    path_abs.strip_prefix(root_abs).ok().map(Path::to_path_buf)
}
