//! File resolution collaborator.
//!
//! The [`SourceProvider`] trait abstracts file I/O so the compiler and the
//! import loader never touch `std::fs` directly.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Result of [`SourceProvider::read_file`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReadFile {
    pub abs_path: PathBuf,
    /// `None` when the file does not exist.
    pub content: Option<String>,
}

pub trait SourceProvider {
    /// Read a document. A missing file is `Ok` with no content; `Err` is
    /// reserved for real I/O failures.
    fn read_file(&self, path: &Path) -> Result<ReadFile, std::io::Error>;

    /// Resolve a reference written in a document against the directory of
    /// the referring file.
    fn resolve_import(&self, base: &Path, import: &str) -> Result<PathBuf, std::io::Error>;
}

/// Normalize a path by resolving `.` and `..` components without touching
/// the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !components.is_empty() {
                    components.pop();
                }
            }
            other => components.push(other),
        }
    }
    components.iter().collect()
}

/// Filesystem-backed provider.
pub struct FileSystemProvider;

impl SourceProvider for FileSystemProvider {
    fn read_file(&self, path: &Path) -> Result<ReadFile, std::io::Error> {
        let abs_path = if path.is_absolute() {
            normalize_path(path)
        } else {
            normalize_path(&std::env::current_dir()?.join(path))
        };
        match std::fs::read_to_string(&abs_path) {
            Ok(content) => Ok(ReadFile {
                abs_path,
                content: Some(content),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ReadFile {
                abs_path,
                content: None,
            }),
            Err(e) => Err(e),
        }
    }

    fn resolve_import(&self, base: &Path, import: &str) -> Result<PathBuf, std::io::Error> {
        Ok(normalize_path(&base.join(import)))
    }
}

/// In-memory provider for tests and embedding.
pub struct InMemoryProvider {
    files: HashMap<PathBuf, String>,
}

impl InMemoryProvider {
    pub fn new(files: HashMap<PathBuf, String>) -> Self {
        let files = files
            .into_iter()
            .map(|(path, content)| (normalize_path(&path), content))
            .collect();
        Self { files }
    }
}

impl SourceProvider for InMemoryProvider {
    fn read_file(&self, path: &Path) -> Result<ReadFile, std::io::Error> {
        let abs_path = normalize_path(path);
        let content = self.files.get(&abs_path).cloned();
        Ok(ReadFile { abs_path, content })
    }

    fn resolve_import(&self, base: &Path, import: &str) -> Result<PathBuf, std::io::Error> {
        Ok(normalize_path(&base.join(import)))
    }
}
