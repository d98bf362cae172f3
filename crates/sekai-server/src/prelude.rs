//! Prelude module for sekai-server.
//!
//! # Example
//!
//! ```rust
//! use sekai_server::prelude::*;
//! ```

// Re-export extractor types
pub use crate::extract::*;
// Re-export middleware types
pub use crate::middleware::*;
// Re-export service types
pub use crate::service::*;
