//! Blob store abstraction.

use std::io;

use bytes::Bytes;
use futures::stream::BoxStream;

use crate::error::StoreResult;

/// Ordered stream of object chunks.
pub type BlobStream = BoxStream<'static, io::Result<Bytes>>;

/// Keyed object store from which chart files are fetched.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Opens the object at `key` and returns its body as a chunk stream.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoSuchKey`] if no object exists at `key`.
    ///
    /// [`StoreError::NoSuchKey`]: crate::StoreError::NoSuchKey
    async fn get_object(&self, key: &str) -> StoreResult<BlobStream>;
}
