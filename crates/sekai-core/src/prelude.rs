//! Prelude module for convenient imports.

pub use crate::chart::{ChartParser, ParseError, ParseResult, SusParser};
pub use crate::io::{gunzip, gzip, read_to_string};
pub use crate::level::{LevelData, LevelDataEntity, LevelDataValue};
