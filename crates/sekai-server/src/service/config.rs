#[cfg(feature = "config")]
use clap::Args;
use derive_builder::Builder;
use sekai_opendal::{BackendType, StorageBackend, StorageConfig};
use serde::{Deserialize, Serialize};

use crate::service::{Error, Result};

/// Tracing target for service configuration.
const TRACING_TARGET: &str = "sekai_server::service::config";

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Default, Serialize, Deserialize, Builder)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
#[builder(
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(validate = "Self::validate")
)]
pub struct ServiceConfig {
    /// Object storage holding the chart files.
    #[builder(default)]
    #[cfg_attr(feature = "config", command(flatten))]
    pub storage: StorageConfig,
}

impl ServiceConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> Result<()> {
        validate_storage(&self.storage).map_err(Error::config)
    }

    /// Creates the storage backend chart files are read from.
    pub fn connect_storage(&self) -> Result<StorageBackend> {
        self.validate()?;

        let backend = StorageBackend::new(self.storage.clone()).map_err(|err| {
            Error::storage("Failed to create storage backend").with_source(err)
        })?;

        tracing::info!(
            target: TRACING_TARGET,
            backend = %backend.backend_type(),
            bucket = %self.storage.bucket,
            "Storage backend created"
        );

        Ok(backend)
    }
}

impl ServiceConfigBuilder {
    /// Wrapper for builder validation that returns String errors.
    fn validate(builder: &ServiceConfigBuilder) -> Result<(), String> {
        match &builder.storage {
            Some(storage) => validate_storage(storage),
            None => Ok(()),
        }
    }
}

fn validate_storage(storage: &StorageConfig) -> Result<(), String> {
    if storage.backend_type != BackendType::S3 {
        return Ok(());
    }

    if storage.bucket.is_empty() {
        return Err("S3 bucket name cannot be empty".to_owned());
    }

    if storage.access_key_id.is_some() != storage.secret_access_key.is_some() {
        return Err("S3 access key id and secret access key must be set together".to_owned());
    }

    Ok(())
}
