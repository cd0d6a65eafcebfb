use async_trait::async_trait;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

use super::{FileSystem, FsError, FsResult};

/// In-memory filesystem with a fixed virtual working directory.
#[derive(Debug, Clone)]
pub struct MemoryFileSystem {
    files: FxHashMap<PathBuf, String>,
    cwd: PathBuf,
}

impl MemoryFileSystem {
    /// Empty filesystem rooted at `/`
    pub fn new() -> Self {
        Self::with_cwd("/")
    }

    pub fn with_cwd(cwd: impl Into<PathBuf>) -> Self {
        Self {
            files: FxHashMap::default(),
            cwd: cwd.into(),
        }
    }

    /// Add a file, resolving relative paths against the virtual cwd
    pub fn with_file(mut self, path: impl AsRef<Path>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&mut self, path: impl AsRef<Path>, contents: impl Into<String>) {
        let path = self.cwd.join(path.as_ref());
        self.files.insert(path, contents.into());
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileSystem for MemoryFileSystem {
    async fn read_file(&self, path: &Path) -> FsResult<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| FsError::FileNotFound(path.to_path_buf()))
    }

    fn cwd(&self) -> FsResult<PathBuf> {
        Ok(self.cwd.clone())
    }
}
