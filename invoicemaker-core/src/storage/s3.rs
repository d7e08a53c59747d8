// S3-compatible storage backend.
//
// Supports AWS S3, MinIO, and any S3-compatible endpoint, via OpenDAL.
// Credentials may be omitted, in which case OpenDAL falls back to its usual
// credential chain (environment, instance profile).

use std::io::{Error, ErrorKind, Result};

use async_trait::async_trait;
use bytes::Bytes;
use opendal::{services::S3, Operator};

use super::MediaStorage;
use crate::config::S3Config;

pub struct S3Storage {
    operator: Operator,
}

impl S3Storage {
    pub fn new(config: &S3Config) -> Result<Self> {
        tracing::info!("Initializing S3 storage: bucket={}", config.bucket);

        let mut builder = S3::default().bucket(&config.bucket);
        if let Some(access_key_id) = &config.access_key_id {
            builder = builder.access_key_id(access_key_id);
        }
        if let Some(secret_access_key) = &config.secret_access_key {
            builder = builder.secret_access_key(secret_access_key);
        }
        if let Some(region) = &config.region {
            builder = builder.region(region);
        }
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint(endpoint);
        }

        let operator = Operator::new(builder)
            .map_err(|e| Error::other(format!("S3 operator init failed: {e}")))?
            .finish();

        Ok(Self { operator })
    }
}

#[async_trait]
impl MediaStorage for S3Storage {
    async fn write(&self, key: &str, data: Bytes) -> Result<()> {
        self.operator
            .write(key, data)
            .await
            .map_err(|e| Error::other(format!("S3 write failed: {e}")))?;
        tracing::trace!("Wrote to S3: {}", key);
        Ok(())
    }

    async fn read(&self, key: &str) -> Result<Bytes> {
        let buffer = self.operator.read(key).await.map_err(|e| {
            if e.kind() == opendal::ErrorKind::NotFound {
                Error::new(ErrorKind::NotFound, format!("key not found: {key}"))
            } else {
                Error::other(format!("S3 read failed: {e}"))
            }
        })?;
        let data = Bytes::from(buffer.to_vec());
        tracing::trace!("Read from S3: {} ({} bytes)", key, data.len());
        Ok(data)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.operator
            .delete(key)
            .await
            .map_err(|e| Error::other(format!("S3 delete failed: {e}")))?;
        tracing::trace!("Deleted from S3: {}", key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        match self.operator.exists(key).await {
            Ok(exists) => Ok(exists),
            Err(e) => {
                tracing::warn!("S3 exists check failed for {}: {}", key, e);
                Ok(false)
            }
        }
    }
}
