// In-memory storage backend.
//
// Used by tests that exercise storage-dependent flows (the logo backfill)
// without touching the filesystem. Data is lost when the process exits.

use std::collections::HashMap;
use std::io::{Error, ErrorKind, Result};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Mutex;

use super::MediaStorage;

#[derive(Clone, Default)]
pub struct MemoryStorage {
    data: Arc<Mutex<HashMap<String, Bytes>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MediaStorage for MemoryStorage {
    async fn write(&self, key: &str, data: Bytes) -> Result<()> {
        self.data.lock().await.insert(key.to_string(), data);
        Ok(())
    }

    async fn read(&self, key: &str) -> Result<Bytes> {
        self.data
            .lock()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| Error::new(ErrorKind::NotFound, format!("key not found: {key}")))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.data.lock().await.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.data.lock().await.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip() {
        let storage = MemoryStorage::new();
        storage
            .write("logos/a.png", Bytes::from_static(b"abc"))
            .await
            .unwrap();

        assert!(storage.exists("logos/a.png").await.unwrap());
        assert_eq!(
            storage.read("logos/a.png").await.unwrap(),
            Bytes::from_static(b"abc")
        );

        storage.delete("logos/a.png").await.unwrap();
        assert!(!storage.exists("logos/a.png").await.unwrap());
        assert_eq!(
            storage.read("logos/a.png").await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }
}
