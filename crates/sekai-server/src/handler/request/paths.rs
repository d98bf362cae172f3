//! Path parameter types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Path parameters for level routes.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LevelPathParams {
    /// Content hash of the stored chart file.
    pub hash: String,
}
