//! Filesystem helpers for job temp resources.

use std::path::Path;
use tokio::fs;
use tracing::warn;

/// Remove a file, logging instead of failing.
///
/// Cleanup paths run on every job exit, including error exits; a failed
/// unlink must not mask the job's actual outcome. A missing file is fine.
pub async fn remove_quietly(path: impl AsRef<Path>) {
    let path = path.as_ref();
    match fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to remove temp file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_remove_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scratch.mp4");
        tokio::fs::write(&path, b"x").await.unwrap();
        remove_quietly(&path).await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_remove_missing_file_is_quiet() {
        let dir = tempfile::tempdir().unwrap();
        remove_quietly(dir.path().join("absent.mp4")).await;
    }
}
