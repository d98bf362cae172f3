//! Blob store error types.

use serde_json::Value;

/// Error code reported by S3-compatible stores for a missing object.
pub const NO_SUCH_KEY: &str = "NoSuchKey";

/// Result type for blob store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned when fetching an object from a blob store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No object exists at the requested key.
    #[error("no such key: {key}")]
    NoSuchKey { key: String },

    /// The store answered with a structured service error.
    #[error("store service error {status_code}: {code}")]
    Service { code: String, status_code: u16 },

    /// Any other failure.
    #[error("{0}")]
    Unknown(String),
}

impl StoreError {
    /// Creates a missing-object error.
    pub fn no_such_key(key: impl Into<String>) -> Self {
        Self::NoSuchKey { key: key.into() }
    }

    /// Creates a structured service error.
    pub fn service(code: impl Into<String>, status_code: u16) -> Self {
        Self::Service {
            code: code.into(),
            status_code,
        }
    }

    /// Creates an unclassified error.
    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }

    /// Attaches the requested key to a missing-object error.
    pub fn with_key(self, key: impl Into<String>) -> Self {
        match self {
            Self::NoSuchKey { .. } => Self::no_such_key(key),
            other => other,
        }
    }

    /// Classifies a raw S3-style error payload for the object at `key`.
    ///
    /// A `Code` of `NoSuchKey` wins regardless of the other fields. Payloads
    /// matching [`is_store_error`] whose status fits an HTTP status code become
    /// [`StoreError::Service`], everything else [`StoreError::Unknown`].
    pub fn from_payload(key: &str, payload: &Value) -> Self {
        if payload.get("Code").and_then(Value::as_str) == Some(NO_SUCH_KEY) {
            return Self::no_such_key(key);
        }

        if !is_store_error(payload) {
            let msg = match payload {
                Value::String(msg) => msg.clone(),
                other => other.to_string(),
            };
            return Self::Unknown(msg);
        }

        let code = payload["Code"].as_str().unwrap_or_default();
        let status = payload["$metadata"]["httpStatusCode"]
            .as_u64()
            .and_then(|status| u16::try_from(status).ok());

        match status {
            Some(status) => Self::service(code, status),
            None => Self::Unknown(payload.to_string()),
        }
    }
}

/// Returns `true` if `value` has the shape of an S3 service error.
///
/// That is an object with a string `Code` and an object `$metadata` whose
/// `httpStatusCode` is a number.
pub fn is_store_error(value: &Value) -> bool {
    let Some(object) = value.as_object() else {
        return false;
    };

    let has_code = object.get("Code").is_some_and(Value::is_string);
    let has_status = object
        .get("$metadata")
        .and_then(Value::as_object)
        .and_then(|metadata| metadata.get("httpStatusCode"))
        .is_some_and(Value::is_number);

    has_code && has_status
}

impl From<opendal::Error> for StoreError {
    fn from(err: opendal::Error) -> Self {
        use opendal::ErrorKind;

        match err.kind() {
            ErrorKind::NotFound => Self::NoSuchKey {
                key: String::new(),
            },
            ErrorKind::PermissionDenied => Self::service("AccessDenied", 403),
            ErrorKind::RateLimited => Self::service("SlowDown", 503),
            _ => Self::Unknown(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn predicate_rejects_non_objects() {
        assert!(!is_store_error(&Value::Null));
        assert!(!is_store_error(&json!("NoSuchKey")));
        assert!(!is_store_error(&json!(404)));
        assert!(!is_store_error(&json!([{"Code": "NoSuchKey"}])));
    }

    #[test]
    fn predicate_requires_metadata_status() {
        assert!(!is_store_error(&json!({"Code": "AccessDenied"})));
        assert!(!is_store_error(&json!({"Code": "AccessDenied", "$metadata": null})));
        assert!(!is_store_error(&json!({"Code": "AccessDenied", "$metadata": {}})));
        assert!(!is_store_error(
            &json!({"Code": "AccessDenied", "$metadata": {"httpStatusCode": "403"}})
        ));
    }

    #[test]
    fn predicate_requires_string_code() {
        assert!(!is_store_error(
            &json!({"Code": 403, "$metadata": {"httpStatusCode": 403}})
        ));
    }

    #[test]
    fn predicate_accepts_service_errors() {
        assert!(is_store_error(
            &json!({"Code": "AccessDenied", "$metadata": {"httpStatusCode": 403}})
        ));
        assert!(is_store_error(
            &json!({"Code": "", "$metadata": {"httpStatusCode": 500, "requestId": "r"}, "extra": 1})
        ));
    }

    #[test]
    fn no_such_key_wins_without_metadata() {
        let err = StoreError::from_payload("SusFile/abc", &json!({"Code": "NoSuchKey"}));
        assert_eq!(err, StoreError::no_such_key("SusFile/abc"));
    }

    #[test]
    fn shaped_payload_becomes_service_error() {
        let payload = json!({"Code": "AccessDenied", "$metadata": {"httpStatusCode": 403}});
        assert_eq!(
            StoreError::from_payload("k", &payload),
            StoreError::service("AccessDenied", 403)
        );
    }

    #[test]
    fn unrepresentable_status_is_unknown() {
        for status in [json!(70000), json!(403.7), json!(-1)] {
            let payload = json!({"Code": "AccessDenied", "$metadata": {"httpStatusCode": status}});
            assert!(
                matches!(StoreError::from_payload("k", &payload), StoreError::Unknown(_)),
                "{payload}"
            );
        }
    }

    #[test]
    fn other_payloads_are_unknown() {
        assert_eq!(
            StoreError::from_payload("k", &json!("network down")),
            StoreError::unknown("network down")
        );
        assert!(matches!(
            StoreError::from_payload("k", &json!({"message": "boom"})),
            StoreError::Unknown(_)
        ));
    }

    #[test]
    fn opendal_not_found_maps_to_no_such_key() {
        let err = opendal::Error::new(opendal::ErrorKind::NotFound, "missing");
        assert_eq!(
            StoreError::from(err).with_key("SusFile/abc"),
            StoreError::no_such_key("SusFile/abc")
        );

        let err = opendal::Error::new(opendal::ErrorKind::Unexpected, "boom");
        assert!(matches!(StoreError::from(err), StoreError::Unknown(_)));
    }
}
