//! Application state and dependency injection.

mod config;
mod level_data;
mod state;

pub use crate::service::config::{ServiceConfig, ServiceConfigBuilder};
pub use crate::service::level_data::{LevelDataError, LevelDataService, SUS_FILE_PREFIX};
pub use crate::service::state::ServiceState;
// Re-export error types from crate root for convenience
pub use crate::{Error, ErrorKind, Result};
