//! Prelude module for convenient imports.

pub use crate::backend::StorageBackend;
pub use crate::config::{BackendType, StorageConfig};
pub use crate::error::{StoreError, StoreResult};
#[cfg(any(test, feature = "test-utils"))]
pub use crate::fixture::FixtureStore;
pub use crate::store::{BlobStore, BlobStream};
