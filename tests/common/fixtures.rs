// Test fixtures for integration testing

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

/// Throwaway vault on disk
pub struct TestVault {
    pub dir: TempDir,
    pub files: Vec<PathBuf>,
}

impl TestVault {
    /// Create a vault with the given relative paths and contents
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().unwrap();
        let mut paths = Vec::new();

        for (path, content) in files {
            let full_path = dir.path().join(path);
            fs::create_dir_all(full_path.parent().unwrap()).unwrap();
            fs::write(&full_path, content).unwrap();
            paths.push(full_path);
        }

        Self { dir, files: paths }
    }

    /// `count` single-chunk notes named `notes/note_00.md`, ...
    #[allow(dead_code)] // Used in integration tests
    pub fn with_notes(count: usize) -> Self {
        let specs: Vec<(String, String)> = (0..count)
            .map(|i| {
                (
                    format!("notes/note_{i:02}.md"),
                    format!("# Note {i}\n\nThis is the body of note number {i}."),
                )
            })
            .collect();

        Self::with_files(
            specs
                .iter()
                .map(|(p, c)| (p.as_str(), c.as_str()))
                .collect::<Vec<_>>()
                .as_slice(),
        )
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of a vault-relative file
    pub fn file(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Overwrite a file and move its mtime forward, so the change is
    /// visible even on coarse-resolution filesystems
    #[allow(dead_code)] // Used in integration tests
    pub fn rewrite(&self, relative: &str, content: &str) {
        let path = self.file(relative);
        fs::write(&path, content).unwrap();
        self.touch(relative, 120);
    }

    /// Shift a file's mtime by `seconds` without touching its bytes
    #[allow(dead_code)] // Used in integration tests
    pub fn touch(&self, relative: &str, seconds: u64) {
        let path = self.file(relative);
        let current = fs::metadata(&path).unwrap().modified().unwrap();
        let file = fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(current + Duration::from_secs(seconds))
            .unwrap();
    }
}
