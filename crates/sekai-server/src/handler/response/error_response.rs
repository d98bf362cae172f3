use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// HTTP error body.
///
/// Only `error` and `code` are sent to clients. Context stays server-side and
/// is recorded in logs.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ErrorResponse<'a> {
    /// Human-readable error message.
    pub error: Cow<'a, str>,
    /// Stable, machine-readable error code.
    pub code: Cow<'a, str>,

    /// Internal context for debugging (not exposed to client)
    #[serde(skip)]
    pub context: Option<Cow<'a, str>>,
    /// HTTP status code (not serialized in JSON)
    #[serde(skip, default = "default_status")]
    pub status: StatusCode,
}

fn default_status() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

impl<'a> ErrorResponse<'a> {
    // 4xx Client Errors
    pub const BAD_REQUEST: Self = Self::new("Bad Request", "bad_request", StatusCode::BAD_REQUEST);
    pub const FILE_NOT_FOUND: Self =
        Self::new("File not found", "file_not_found", StatusCode::NOT_FOUND);
    pub const NOT_FOUND: Self = Self::new("Not Found", "not_found", StatusCode::NOT_FOUND);
    pub const UNEXPECTED_MISSING_BAR: Self = Self::new(
        "Unexpected missing bar",
        "unexpected_missing_bar",
        StatusCode::BAD_REQUEST,
    );
    // 5xx Server Errors
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "Internal Server Error",
        "internal_server_error",
        StatusCode::INTERNAL_SERVER_ERROR,
    );

    /// Creates a new error response.
    #[inline]
    pub const fn new(error: &'a str, code: &'a str, status: StatusCode) -> Self {
        Self {
            error: Cow::Borrowed(error),
            code: Cow::Borrowed(code),
            context: None,
            status,
        }
    }

    /// Attaches context to the error response.
    /// If context already exists, it merges them with a separator.
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        let new_context = context.into();
        self.context = Some(match self.context {
            Some(existing) => Cow::Owned(format!("{}; {}", existing, new_context)),
            None => new_context,
        });
        self
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse<'_> {
    #[inline]
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
