//! Header-aware text chunking with a size-based fallback.
//!
//! Text is first split at markdown headers. Sections that fit the
//! target size become one chunk each; larger sections are cut into
//! overlapping windows that prefer whitespace boundaries. All sizes
//! are measured in **characters**, never bytes, so cuts always fall
//! on valid UTF-8 boundaries.
//!
//! # Example
//!
//! ```
//! use vault_indexer::core::indexer::Chunker;
//! use std::path::Path;
//!
//! let chunker = Chunker::new(512, 64);
//! let chunks = chunker.chunk("# Title\n\nHello 👋 World 🌍", Path::new("notes/a.md"));
//!
//! assert_eq!(chunks.len(), 1);
//! assert_eq!(chunks[0].kind(), Some("header"));
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::path::{Component, Path, PathBuf};

use crate::core::indexer::normalizer::normalize_unicode;
use crate::core::types::{Chunk, ChunkKind, Metadata};

/// Remaining text at or below this many characters is merged into
/// the previous chunk instead of becoming its own chunk
pub const MIN_CHUNK_CHARS: usize = 50;

/// How far back from a cut point to look for whitespace
const WORD_BOUNDARY_SEARCH: usize = 100;

/// Spacing between header segments in the chunk index space, widened
/// in whole steps when a section splits into more pieces
const SEGMENT_STRIDE: usize = 1000;

static HEADER_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#{1,6}[ \t]+\S.*$").expect("header regex"));

/// Header-aware chunker.
///
/// Produces chunks whose ids depend only on the file path and the
/// chunk position, so re-chunking an unchanged file reproduces the
/// same ids.
#[derive(Debug, Clone)]
pub struct Chunker {
    /// Target characters per chunk
    chunk_size: usize,

    /// Characters shared between consecutive size-based pieces
    overlap: usize,
}

impl Chunker {
    /// Create a new chunker.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is 0 or if `overlap >= chunk_size`.
    /// Configuration validation rejects both before a chunker is
    /// built from user input, and also requires `chunk_size` of at
    /// least [`MIN_CHUNK_CHARS`]. Below that, single-character pieces
    /// are possible.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        assert!(chunk_size > 0, "chunk_size must be > 0");
        assert!(overlap < chunk_size, "overlap must be < chunk_size");

        Self {
            chunk_size,
            overlap,
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Chunk normalized document text.
    ///
    /// Empty input yields a single empty chunk; callers drop it.
    ///
    /// # Arguments
    ///
    /// * `text` - Normalized document text
    /// * `path` - Source file path, used for ids and metadata
    pub fn chunk(&self, text: &str, path: &Path) -> Vec<Chunk> {
        let segments: Vec<(ChunkKind, Vec<String>)> = split_by_headers(text)
            .into_iter()
            .map(|section| {
                if section.chars().count() <= self.chunk_size {
                    (ChunkKind::Header, vec![section])
                } else {
                    (ChunkKind::SubHeader, self.split_by_size(&section))
                }
            })
            .collect();

        let widest = segments.iter().map(|(_, pieces)| pieces.len()).max();
        let stride = segment_stride(widest.unwrap_or(0));

        let mut chunks = Vec::new();
        for (segment, (kind, pieces)) in segments.into_iter().enumerate() {
            for (sub, piece) in pieces.into_iter().enumerate() {
                chunks.push(make_chunk(path, segment * stride + sub, piece, kind));
            }
        }

        if chunks.is_empty() {
            chunks = self
                .split_by_size(text)
                .into_iter()
                .enumerate()
                .map(|(i, piece)| make_chunk(path, i, piece, ChunkKind::Size))
                .collect();
        }

        chunks
    }

    /// Cut text into overlapping windows of at most `chunk_size`
    /// characters.
    ///
    /// Cuts move back to the nearest whitespace within
    /// [`WORD_BOUNDARY_SEARCH`] characters, but never before the
    /// middle of the window. Overlap is capped at half the emitted
    /// window so each step makes real progress. When at most
    /// [`MIN_CHUNK_CHARS`] characters would remain, the current piece
    /// runs to the end of the text instead.
    pub fn split_by_size(&self, text: &str) -> Vec<String> {
        // Byte offset of every char plus the end of the string, so
        // slices are always taken on char boundaries
        let mut bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        let n = bounds.len();
        bounds.push(text.len());

        if n <= self.chunk_size {
            return vec![text.to_string()];
        }

        let chars: Vec<char> = text.chars().collect();
        let slice = |from: usize, to: usize| &text[bounds[from]..bounds[to]];

        let mut pieces: Vec<String> = Vec::new();
        let mut start = 0;

        loop {
            let mut end = (start + self.chunk_size).min(n);

            if end < n {
                let floor = end
                    .saturating_sub(WORD_BOUNDARY_SEARCH)
                    .max(start + (end - start) / 2);
                if let Some(cut) = (floor..=end).rev().find(|&i| chars[i].is_whitespace()) {
                    end = cut;
                }
            }

            let overlap = self.overlap.min((end - start) / 2);
            let next = end - overlap;

            // A short remainder extends this piece instead of standing alone
            if end < n
                && (next <= start || slice(end, n).trim().chars().count() <= MIN_CHUNK_CHARS)
            {
                end = n;
            }

            let piece = slice(start, end).trim();
            if !piece.is_empty() {
                pieces.push(piece.to_string());
            }

            if end >= n {
                break;
            }

            start = next;
        }

        pieces
    }
}

/// Split text into one segment per markdown header, plus a leading
/// segment for any preamble.
///
/// Segments are trimmed and empty ones dropped. Text without headers
/// is a single segment.
pub fn split_by_headers(text: &str) -> Vec<String> {
    let starts: Vec<usize> = HEADER_LINE.find_iter(text).map(|m| m.start()).collect();

    if starts.is_empty() {
        return vec![text.trim().to_string()];
    }

    let mut bounds = Vec::with_capacity(starts.len() + 2);
    bounds.push(0);
    bounds.extend(starts.iter().copied().filter(|&s| s > 0));
    bounds.push(text.len());

    bounds
        .windows(2)
        .map(|w| text[w[0]..w[1]].trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Segment spacing for a file whose largest section has `widest`
/// pieces, so sub-chunk indices never reach the next segment
fn segment_stride(widest: usize) -> usize {
    SEGMENT_STRIDE * widest.div_ceil(SEGMENT_STRIDE).max(1)
}

/// Stable chunk id: first 16 bytes of SHA-256 over the normalized
/// path and chunk index, as 32 hex characters
pub fn chunk_id(path: &Path, index: usize) -> String {
    let clean: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let normalized = normalize_unicode(&clean.to_string_lossy());

    let digest = Sha256::digest(format!("{normalized}_chunk_{index}").as_bytes());
    hex::encode(&digest[..16])
}

fn make_chunk(path: &Path, index: usize, text: String, kind: ChunkKind) -> Chunk {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let folder = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_string_lossy().into_owned(),
        _ => ".".to_string(),
    };

    let mut metadata = Metadata::new();
    metadata.insert(
        "path".to_string(),
        Value::from(path.to_string_lossy().into_owned()),
    );
    metadata.insert("filename".to_string(), Value::from(filename));
    metadata.insert("folder".to_string(), Value::from(folder));
    metadata.insert("chunk_index".to_string(), Value::from(index));
    metadata.insert("chunk_type".to_string(), Value::from(kind.as_str()));

    Chunk {
        id: chunk_id(path, index),
        text,
        metadata,
    }
}
