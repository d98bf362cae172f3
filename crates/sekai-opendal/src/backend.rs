//! Storage backend implementation.

use bytes::Bytes;
use futures::StreamExt;
use opendal::{Operator, services};

use crate::TRACING_TARGET;
use crate::config::{BackendType, StorageConfig};
use crate::error::{StoreError, StoreResult};
use crate::store::{BlobStore, BlobStream};

/// Blob store backed by an OpenDAL operator.
#[derive(Clone)]
pub struct StorageBackend {
    operator: Operator,
    config: StorageConfig,
}

impl StorageBackend {
    /// Creates a new storage backend from configuration.
    pub fn new(config: StorageConfig) -> StoreResult<Self> {
        let operator = Self::create_operator(&config)?;

        tracing::info!(
            target: TRACING_TARGET,
            backend = %config.backend_type,
            bucket = %config.bucket,
            root = %config.root,
            "Storage backend initialized"
        );

        Ok(Self { operator, config })
    }

    /// Returns the configuration for this backend.
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Returns the backend type.
    pub fn backend_type(&self) -> BackendType {
        self.config.backend_type
    }

    /// Writes an object.
    pub async fn put_object(&self, key: &str, data: impl Into<Bytes>) -> StoreResult<()> {
        let data = data.into();

        tracing::debug!(
            target: TRACING_TARGET,
            key = %key,
            size = data.len(),
            "Writing object"
        );

        self.operator.write(key, data).await?;
        Ok(())
    }

    #[allow(unreachable_patterns)]
    fn create_operator(config: &StorageConfig) -> StoreResult<Operator> {
        match config.backend_type {
            #[cfg(feature = "s3")]
            BackendType::S3 => {
                let mut builder = services::S3::default()
                    .bucket(&config.bucket)
                    .root(&config.root);

                if let Some(ref region) = config.region {
                    builder = builder.region(region);
                }

                if let Some(ref endpoint) = config.endpoint {
                    builder = builder.endpoint(endpoint);
                }

                if let Some(ref access_key_id) = config.access_key_id {
                    builder = builder.access_key_id(access_key_id);
                }

                if let Some(ref secret_access_key) = config.secret_access_key {
                    builder = builder.secret_access_key(secret_access_key);
                }

                Operator::new(builder)
                    .map(|op| op.finish())
                    .map_err(|e| StoreError::unknown(format!("storage initialization failed: {e}")))
            }

            #[cfg(feature = "memory")]
            BackendType::Memory => {
                let builder = services::Memory::default().root(&config.root);

                Operator::new(builder)
                    .map(|op| op.finish())
                    .map_err(|e| StoreError::unknown(format!("storage initialization failed: {e}")))
            }

            _ => Err(StoreError::unknown(format!(
                "backend `{}` is not supported with current features",
                config.backend_type
            ))),
        }
    }
}

#[async_trait::async_trait]
impl BlobStore for StorageBackend {
    async fn get_object(&self, key: &str) -> StoreResult<BlobStream> {
        tracing::debug!(
            target: TRACING_TARGET,
            key = %key,
            "Getting object"
        );

        // Readers are lazy; stat surfaces a missing key before streaming starts.
        let meta = self
            .operator
            .stat(key)
            .await
            .map_err(|e| StoreError::from(e).with_key(key))?;

        let stream = self
            .operator
            .reader(key)
            .await
            .map_err(|e| StoreError::from(e).with_key(key))?
            .into_bytes_stream(..)
            .await
            .map_err(|e| StoreError::from(e).with_key(key))?;

        tracing::debug!(
            target: TRACING_TARGET,
            key = %key,
            size = meta.content_length(),
            "Object stream opened"
        );

        Ok(stream.boxed())
    }
}

impl std::fmt::Debug for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageBackend")
            .field("backend_type", &self.config.backend_type)
            .field("bucket", &self.config.bucket)
            .field("root", &self.config.root)
            .finish()
    }
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use futures::TryStreamExt;

    use super::*;

    #[tokio::test]
    async fn memory_backend_streams_objects() {
        let backend = StorageBackend::new(StorageConfig::memory()).unwrap();
        backend.put_object("SusFile/abc", "#00002: 4").await.unwrap();

        let chunks: Vec<Bytes> = backend
            .get_object("SusFile/abc")
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(chunks.concat(), b"#00002: 4");
    }

    #[tokio::test]
    async fn memory_backend_reports_missing_key() {
        let backend = StorageBackend::new(StorageConfig::memory()).unwrap();

        let err = backend.get_object("SusFile/missing").await.err().unwrap();
        assert_eq!(err, StoreError::no_such_key("SusFile/missing"));
    }
}
