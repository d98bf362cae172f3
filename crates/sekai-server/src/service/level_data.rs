//! Fetch-and-parse of stored chart files.

use std::sync::Arc;

use sekai_core::{ChartParser, LevelData, ParseError, read_to_string};
use sekai_opendal::{BlobStore, StoreError};

use crate::BoxedError;

/// Tracing target for level data operations.
const TRACING_TARGET: &str = "sekai_server::service::level_data";

/// Key prefix under which chart files are stored.
pub const SUS_FILE_PREFIX: &str = "SusFile";

/// Failure of [`LevelDataService::fetch_level_data`].
#[derive(Debug, thiserror::Error)]
pub enum LevelDataError {
    /// No chart file is stored for the hash.
    #[error("file not found: {key}")]
    FileNotFound { key: String },

    /// The chart has notes before its first bar-length definition.
    #[error(transparent)]
    UnexpectedMissingBar(ParseError),

    /// Store, stream or parser failure with no client-facing detail.
    #[error("internal error: {0}")]
    Internal(#[source] BoxedError),
}

impl LevelDataError {
    fn internal(err: impl Into<BoxedError>) -> Self {
        Self::Internal(err.into())
    }
}

/// Loads chart files from a blob store and parses them into level data.
#[derive(Clone)]
pub struct LevelDataService {
    store: Arc<dyn BlobStore>,
    parser: Arc<dyn ChartParser>,
}

impl LevelDataService {
    /// Creates a new service over `store` using `parser` for chart text.
    pub fn new(store: impl BlobStore + 'static, parser: impl ChartParser + 'static) -> Self {
        Self {
            store: Arc::new(store),
            parser: Arc::new(parser),
        }
    }

    /// Returns the store key of the chart file with the given content hash.
    ///
    /// The hash is used as-is.
    pub fn object_key(hash: &str) -> String {
        format!("{SUS_FILE_PREFIX}/{hash}")
    }

    /// Fetches the chart stored for `hash` and parses it.
    ///
    /// Every failure is logged once before it is returned.
    pub async fn fetch_level_data(&self, hash: &str) -> Result<LevelData, LevelDataError> {
        let key = Self::object_key(hash);

        let stream = self
            .store
            .get_object(&key)
            .await
            .map_err(|err| match err {
                StoreError::NoSuchKey { .. } => {
                    tracing::warn!(target: TRACING_TARGET, key = %key, "No such key: {}", key);
                    LevelDataError::FileNotFound { key: key.clone() }
                }
                StoreError::Service { ref code, status_code } => {
                    tracing::error!(
                        target: TRACING_TARGET,
                        key = %key,
                        "S3 GetObject Error: {} / {}",
                        status_code,
                        code
                    );
                    LevelDataError::internal(err)
                }
                StoreError::Unknown(ref msg) => {
                    tracing::error!(
                        target: TRACING_TARGET,
                        key = %key,
                        "Unknown error while getting file: {}",
                        msg
                    );
                    LevelDataError::internal(err)
                }
            })?;

        let text = read_to_string(stream).await.map_err(|err| {
            tracing::error!(
                target: TRACING_TARGET,
                key = %key,
                "Error while reading SUS file: {}",
                err
            );
            LevelDataError::internal(err)
        })?;

        tracing::debug!(
            target: TRACING_TARGET,
            key = %key,
            size = text.len(),
            "Chart file loaded"
        );

        let parser = Arc::clone(&self.parser);
        let parsed = tokio::task::spawn_blocking(move || parser.parse(&text))
            .await
            .map_err(|err| {
                tracing::error!(
                    target: TRACING_TARGET,
                    key = %key,
                    error = %err,
                    "Chart parser task failed"
                );
                LevelDataError::internal(err)
            })?;

        parsed.map_err(|err| {
            tracing::error!(
                target: TRACING_TARGET,
                key = %key,
                "Error while parsing SUS file: {}",
                err
            );

            if err.is_missing_bar() {
                LevelDataError::UnexpectedMissingBar(err)
            } else {
                LevelDataError::internal(err)
            }
        })
    }
}

impl std::fmt::Debug for LevelDataService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LevelDataService").finish_non_exhaustive()
    }
}
