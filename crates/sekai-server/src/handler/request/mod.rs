//! Request types for HTTP handlers.

mod paths;

pub use paths::LevelPathParams;
