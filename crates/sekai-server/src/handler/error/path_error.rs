//! Path extraction failure to HTTP error conversion.

use axum::extract::rejection::PathRejection;

use crate::handler::{Error, ErrorKind};

impl From<PathRejection> for Error<'static> {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(err) => ErrorKind::BadRequest
                .with_context(format!("path parameter deserialization failed: {}", err.body_text())),
            PathRejection::MissingPathParams(err) => ErrorKind::InternalServerError
                .with_context(format!("path parameters missing: {}", err.body_text())),
            other => ErrorKind::InternalServerError.with_context(other.body_text()),
        }
    }
}
