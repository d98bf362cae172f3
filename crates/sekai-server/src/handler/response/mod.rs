//! Response types for HTTP handlers.

mod error_response;
mod levels;
mod monitors;

pub use error_response::ErrorResponse;
pub use levels::GzipLevelData;
pub use monitors::{Health, ServiceStatus};
