//! Filesystem abstraction.
//!
//! The pipeline itself never touches the disk. It needs to turn user paths
//! into absolute ones and to hand a filesystem to the resolver/scanner
//! collaborator, which does the actual reading. Build calls use
//! [`OsFileSystem`]; transform calls use an empty [`MemoryFileSystem`] so a
//! transform can never observe the real filesystem.

mod memory;
#[cfg(not(target_family = "wasm"))]
mod native;

pub use memory::MemoryFileSystem;
#[cfg(not(target_family = "wasm"))]
pub use native::OsFileSystem;

use async_trait::async_trait;
use path_clean::PathClean;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Result type for filesystem operations
pub type FsResult<T> = Result<T, FsError>;

/// Errors that can occur during filesystem operations
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(String),

    /// No working directory is available
    #[error("Working directory unavailable: {0}")]
    NoCwd(String),
}

/// Shared handle passed to collaborators
pub type SharedFileSystem = Arc<dyn FileSystem>;

/// Filesystem seam used by the pipeline and its collaborators.
#[async_trait]
pub trait FileSystem: Send + Sync + std::fmt::Debug {
    /// Read a file as UTF-8 text
    async fn read_file(&self, path: &Path) -> FsResult<String>;

    /// Get the current working directory
    fn cwd(&self) -> FsResult<PathBuf>;

    /// Make `path` absolute against the working directory and normalize it.
    ///
    /// Returns `None` when the path cannot be absolutized.
    fn abs(&self, path: &Path) -> Option<PathBuf> {
        if path.is_absolute() {
            return Some(path.clean());
        }
        let cwd = self.cwd().ok()?;
        Some(cwd.join(path).clean())
    }

    /// Directory containing `path`
    fn dir(&self, path: &Path) -> PathBuf {
        path.parent().map(Path::to_path_buf).unwrap_or_default()
    }
}
