//! In-memory blob store with injectable failures.

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, RwLock};

use bytes::Bytes;
use futures::StreamExt;
use serde_json::Value;

use crate::TRACING_TARGET;
use crate::error::{StoreError, StoreResult};
use crate::store::{BlobStore, BlobStream};

#[derive(Debug, Clone)]
enum Fixture {
    /// Object body split into chunks, optionally failing after them.
    Object {
        chunks: Vec<Bytes>,
        fail_after: Option<io::ErrorKind>,
    },
    /// Raw error payload, classified with [`StoreError::from_payload`].
    Error(Value),
}

/// Blob store serving canned objects and errors.
#[derive(Debug, Clone, Default)]
pub struct FixtureStore {
    fixtures: Arc<RwLock<HashMap<String, Fixture>>>,
}

impl FixtureStore {
    /// Creates an empty fixture store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `body` as a single chunk.
    #[must_use]
    pub fn with_object(self, key: impl Into<String>, body: impl Into<Bytes>) -> Self {
        self.with_chunks(key, [body.into()])
    }

    /// Stores an object delivered as the given chunks.
    #[must_use]
    pub fn with_chunks<I, B>(self, key: impl Into<String>, chunks: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        self.insert(
            key,
            Fixture::Object {
                chunks: chunks.into_iter().map(Into::into).collect(),
                fail_after: None,
            },
        )
    }

    /// Stores an object whose stream fails after yielding `chunks`.
    #[must_use]
    pub fn with_failing_stream<I, B>(
        self,
        key: impl Into<String>,
        chunks: I,
        kind: io::ErrorKind,
    ) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        self.insert(
            key,
            Fixture::Object {
                chunks: chunks.into_iter().map(Into::into).collect(),
                fail_after: Some(kind),
            },
        )
    }

    /// Makes `get_object` fail for `key` with a raw error payload.
    #[must_use]
    pub fn with_error(self, key: impl Into<String>, payload: Value) -> Self {
        self.insert(key, Fixture::Error(payload))
    }

    fn insert(self, key: impl Into<String>, fixture: Fixture) -> Self {
        self.fixtures
            .write()
            .expect("fixture store lock poisoned")
            .insert(key.into(), fixture);
        self
    }
}

#[async_trait::async_trait]
impl BlobStore for FixtureStore {
    async fn get_object(&self, key: &str) -> StoreResult<BlobStream> {
        let fixture = self
            .fixtures
            .read()
            .map_err(|_| StoreError::unknown("fixture store lock poisoned"))?
            .get(key)
            .cloned();

        tracing::trace!(
            target: TRACING_TARGET,
            key = %key,
            found = fixture.is_some(),
            "Fixture lookup"
        );

        match fixture {
            None => Err(StoreError::no_such_key(key)),
            Some(Fixture::Error(payload)) => Err(StoreError::from_payload(key, &payload)),
            Some(Fixture::Object { chunks, fail_after }) => {
                let items = chunks
                    .into_iter()
                    .map(Ok)
                    .chain(fail_after.map(|kind| Err(io::Error::new(kind, "fixture stream failure"))));
                Ok(futures::stream::iter(items).boxed())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::TryStreamExt;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn serves_chunks_in_order() {
        let store = FixtureStore::new().with_chunks("k", ["ab", "cd"]);
        let chunks: Vec<Bytes> = store.get_object("k").await.unwrap().try_collect().await.unwrap();
        assert_eq!(chunks, vec![Bytes::from("ab"), Bytes::from("cd")]);
    }

    #[tokio::test]
    async fn missing_fixture_is_no_such_key() {
        let err = FixtureStore::new().get_object("SusFile/x").await.err().unwrap();
        assert_eq!(err, StoreError::no_such_key("SusFile/x"));
    }

    #[tokio::test]
    async fn classifies_error_payloads() {
        let store = FixtureStore::new()
            .with_error("a", json!({"Code": "NoSuchKey"}))
            .with_error("b", json!({"Code": "AccessDenied", "$metadata": {"httpStatusCode": 403}}))
            .with_error("c", json!("socket hang up"));

        assert!(matches!(store.get_object("a").await, Err(StoreError::NoSuchKey { .. })));
        assert!(matches!(
            store.get_object("b").await,
            Err(StoreError::Service { status_code: 403, .. })
        ));
        assert!(matches!(store.get_object("c").await, Err(StoreError::Unknown(_))));
    }

    #[test]
    #[should_panic(expected = "fixture store lock poisoned")]
    fn poisoned_lock_fails_loudly() {
        let store = FixtureStore::new();
        let fixtures = Arc::clone(&store.fixtures);
        let _ = std::thread::spawn(move || {
            let _guard = fixtures.write().unwrap();
            panic!("writer died");
        })
        .join();

        let _ = store.with_object("k", "body");
    }

    #[tokio::test]
    async fn failing_stream_yields_error_last() {
        let store = FixtureStore::new().with_failing_stream("k", ["ab"], io::ErrorKind::BrokenPipe);
        let items: Vec<_> = store.get_object("k").await.unwrap().collect().await;

        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert_eq!(items[1].as_ref().unwrap_err().kind(), io::ErrorKind::BrokenPipe);
    }
}
