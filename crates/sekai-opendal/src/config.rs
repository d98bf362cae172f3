//! Storage configuration types.

#[cfg(feature = "config")]
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};

/// Storage backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[derive(derive_more::Display)]
#[cfg_attr(feature = "config", derive(ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum BackendType {
    /// Amazon S3 or an S3-compatible service.
    #[default]
    #[display("s3")]
    S3,
    /// Process-local memory, for development and tests.
    #[display("memory")]
    Memory,
}

/// Storage backend configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct StorageConfig {
    /// Storage backend to use.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "STORAGE_BACKEND", value_enum, default_value_t = BackendType::S3)
    )]
    #[serde(default)]
    pub backend_type: BackendType,

    /// Bucket holding chart files.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "S3_BUCKET", default_value = "sekai-sus-files")
    )]
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Bucket region.
    #[cfg_attr(feature = "config", arg(long = "s3-region", env = "S3_REGION"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Custom endpoint URL for S3-compatible services.
    #[cfg_attr(feature = "config", arg(long = "s3-endpoint", env = "S3_ENDPOINT"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Access key ID.
    #[cfg_attr(
        feature = "config",
        arg(long = "s3-access-key-id", env = "S3_ACCESS_KEY_ID")
    )]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,

    /// Secret access key.
    #[cfg_attr(
        feature = "config",
        arg(long = "s3-secret-access-key", env = "S3_SECRET_ACCESS_KEY", hide_env_values = true)
    )]
    #[serde(default, skip_serializing)]
    pub secret_access_key: Option<String>,

    /// Path prefix inside the bucket.
    #[cfg_attr(
        feature = "config",
        arg(long = "s3-root", env = "S3_ROOT", default_value = "/")
    )]
    #[serde(default = "default_root")]
    pub root: String,
}

fn default_bucket() -> String {
    "sekai-sus-files".to_owned()
}

fn default_root() -> String {
    "/".to_owned()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend_type: BackendType::default(),
            bucket: default_bucket(),
            region: None,
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            root: default_root(),
        }
    }
}

impl StorageConfig {
    /// Creates an S3 configuration for `bucket`.
    pub fn s3(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Self::default()
        }
    }

    /// Creates an in-memory configuration.
    pub fn memory() -> Self {
        Self {
            backend_type: BackendType::Memory,
            ..Self::default()
        }
    }

    /// Sets the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Sets a custom endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets static credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self.secret_access_key = Some(secret_access_key.into());
        self
    }

    /// Sets the path prefix.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_s3() {
        let config = StorageConfig::default();
        assert_eq!(config.backend_type, BackendType::S3);
        assert_eq!(config.bucket, "sekai-sus-files");
        assert_eq!(config.root, "/");
    }

    #[test]
    fn secret_is_not_serialized() {
        let config = StorageConfig::s3("charts").with_credentials("id", "secret");
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["access_key_id"], "id");
        assert!(json.get("secret_access_key").is_none());
        assert_eq!(json["backend_type"], "s3");
    }
}
