use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::PipelineError;

/// File extension of downloaded renditions, fixed by the selection rule.
const AUDIO_EXTENSION: &str = "mp4";

/// Owns creation and guaranteed best-effort deletion of one scratch file per
/// request. The working directory is explicit configuration; each job owns
/// its own file exclusively for its lifetime, so path uniqueness is the only
/// discipline needed between concurrent jobs.
#[derive(Debug, Clone)]
pub struct TransientStore {
    root: PathBuf,
}

impl TransientStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ensure the working directory exists
    pub async fn prepare(&self) -> Result<(), PipelineError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| PipelineError::Stream(format!("Failed to create working directory: {}", e)))
    }

    /// Allocate a unique path for one job. The name keeps the Unix-timestamp
    /// prefix of the wire contract but appends a random token, since
    /// seconds-granularity timestamps alone collide under concurrent
    /// requests.
    pub fn allocate(&self, timestamp: i64) -> PathBuf {
        let token = &Uuid::new_v4().simple().to_string()[..8];
        self.root
            .join(format!("{}_{}.{}", timestamp, token, AUDIO_EXTENSION))
    }

    /// Best-effort removal. Missing files and permission errors are swallowed
    /// and never surface to the caller.
    pub async fn remove(&self, path: &Path) {
        if let Err(err) = tokio::fs::remove_file(path).await {
            tracing::debug!("Could not remove transient file {}: {}", path.display(), err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_is_unique_for_equal_timestamps() {
        let store = TransientStore::new("data");
        let first = store.allocate(1_700_000_000);
        let second = store.allocate(1_700_000_000);
        assert_ne!(first, second);
    }

    #[test]
    fn test_allocate_uses_timestamp_and_fixed_extension() {
        let store = TransientStore::new("data");
        let path = store.allocate(1_700_000_000);
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("1700000000_"));
        assert!(name.ends_with(".mp4"));
        assert!(path.starts_with("data"));
    }

    #[tokio::test]
    async fn test_remove_swallows_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = TransientStore::new(dir.path());
        // no panic, no error surfaced
        store.remove(&store.allocate(0)).await;
    }

    #[tokio::test]
    async fn test_remove_deletes_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = TransientStore::new(dir.path());
        store.prepare().await.unwrap();

        let path = store.allocate(1_700_000_000);
        tokio::fs::write(&path, b"audio").await.unwrap();
        assert!(path.exists());

        store.remove(&path).await;
        assert!(!path.exists());
    }
}
