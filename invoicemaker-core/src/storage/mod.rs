//! Media storage abstraction.
//!
//! Uploaded files (business logos) live behind a pluggable key-value
//! interface so the same code serves local-filesystem deployments and
//! S3-compatible object stores. Keys are the relative paths recorded in the
//! database (`logos/acme.png`).

pub mod file;
pub mod memory;
pub mod s3;

use std::io::Result;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::config::StorageConfig;

pub use file::FsStorage;
pub use memory::MemoryStorage;
pub use s3::S3Storage;

/// Pluggable media storage backend.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Write data under a storage key.
    async fn write(&self, key: &str, data: Bytes) -> Result<()>;

    /// Read the data stored under a key. `NotFound` if the key is absent.
    async fn read(&self, key: &str) -> Result<Bytes>;

    /// Delete a key. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check whether a key exists.
    async fn exists(&self, key: &str) -> Result<bool>;
}

/// Build the storage backend the configuration selected.
pub fn from_config(config: &StorageConfig) -> Result<Arc<dyn MediaStorage>> {
    match config {
        StorageConfig::Filesystem { media_root } => {
            Ok(Arc::new(FsStorage::new(media_root.clone())))
        }
        StorageConfig::S3(s3) => Ok(Arc::new(S3Storage::new(s3)?)),
    }
}
