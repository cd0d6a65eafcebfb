use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::task;

use super::{FileSystem, FsError, FsResult};

/// Filesystem backed by `std::fs`.
///
/// Reads run on tokio's blocking pool so they never stall the executor.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl OsFileSystem {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileSystem for OsFileSystem {
    async fn read_file(&self, path: &Path) -> FsResult<String> {
        let path = path.to_path_buf();

        task::spawn_blocking(move || {
            std::fs::read_to_string(&path).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    FsError::FileNotFound(path.clone())
                } else {
                    FsError::Io(format!("Failed to read {}: {}", path.display(), e))
                }
            })
        })
        .await
        .map_err(|e| FsError::Io(format!("Task join error: {}", e)))?
    }

    fn cwd(&self) -> FsResult<PathBuf> {
        std::env::current_dir().map_err(|e| FsError::NoCwd(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn reads_existing_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("entry.js");
        std::fs::write(&file, "export default 1;").unwrap();

        let contents = OsFileSystem.read_file(&file).await.unwrap();
        assert_eq!(contents, "export default 1;");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = OsFileSystem
            .read_file(&temp.path().join("missing.js"))
            .await
            .unwrap_err();
        assert!(matches!(err, FsError::FileNotFound(_)));
    }

    #[test]
    fn abs_joins_relative_paths_onto_cwd() {
        let cwd = std::env::current_dir().unwrap();
        let abs = OsFileSystem.abs(Path::new("src/../out/a.js")).unwrap();
        assert_eq!(abs, cwd.join("out/a.js"));
    }
}
