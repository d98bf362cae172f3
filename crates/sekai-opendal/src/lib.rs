#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod backend;
mod config;
mod error;
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
mod fixture;
mod store;

#[doc(hidden)]
pub mod prelude;

pub use backend::StorageBackend;
pub use config::{BackendType, StorageConfig};
pub use error::{NO_SUCH_KEY, StoreError, StoreResult, is_store_error};
#[cfg(any(test, feature = "test-utils"))]
pub use fixture::FixtureStore;
pub use store::{BlobStore, BlobStream};

/// Tracing target for storage operations.
pub const TRACING_TARGET: &str = "sekai_opendal";
