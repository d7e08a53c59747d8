// Local filesystem storage backend.
//
// Keys are relative paths ("logos/acme.png") resolved under the configured
// media root. Absolute keys and parent-directory components are rejected so
// a hostile key cannot escape the root.

use std::io::{Error, ErrorKind, Result};
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;

use super::MediaStorage;

pub struct FsStorage {
    media_root: PathBuf,
}

impl FsStorage {
    #[must_use]
    pub fn new(media_root: impl Into<PathBuf>) -> Self {
        Self {
            media_root: media_root.into(),
        }
    }

    fn resolve(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let escapes_root = relative.is_absolute()
            || relative
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)));
        if key.is_empty() || escapes_root {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("invalid storage key: {key}"),
            ));
        }
        Ok(self.media_root.join(relative))
    }
}

#[async_trait]
impl MediaStorage for FsStorage {
    async fn write(&self, key: &str, data: Bytes) -> Result<()> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, data).await?;
        tracing::trace!("Wrote: {:?} for key: {}", path, key);
        Ok(())
    }

    async fn read(&self, key: &str) -> Result<Bytes> {
        let path = self.resolve(key)?;
        let data = fs::read(&path).await?;
        tracing::trace!("Read: {:?} ({} bytes) for key: {}", path, data.len(), key);
        Ok(Bytes::from(data))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.resolve(key)?;
        if fs::try_exists(&path).await.unwrap_or(false) {
            fs::remove_file(&path).await?;
            tracing::trace!("Deleted: {:?} for key: {}", path, key);
        }
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let path = self.resolve(key)?;
        fs::try_exists(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_read_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path());

        let data = Bytes::from_static(b"\x89PNG fake image bytes");
        storage.write("logos/acme.png", data.clone()).await.unwrap();

        assert!(storage.exists("logos/acme.png").await.unwrap());
        assert_eq!(storage.read("logos/acme.png").await.unwrap(), data);

        storage.delete("logos/acme.png").await.unwrap();
        assert!(!storage.exists("logos/acme.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_key_reads_as_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path());

        let err = storage.read("logos/nope.png").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(!storage.exists("logos/nope.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_traversal_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path());

        for key in ["../etc/passwd", "/etc/passwd", ""] {
            let err = storage.read(key).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "key: {key}");
        }
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path());
        storage.delete("logos/never-written.png").await.unwrap();
    }
}
