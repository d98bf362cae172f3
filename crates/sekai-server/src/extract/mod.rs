//! Request extractors with handler-level error responses.

mod path;

pub use crate::extract::path::Path;
