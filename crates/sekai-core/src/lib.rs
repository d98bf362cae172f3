#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for chart parsing.
pub const TRACING_TARGET_CHART: &str = "sekai_core::chart";

/// Tracing target for stream and compression helpers.
pub const TRACING_TARGET_IO: &str = "sekai_core::io";

pub mod chart;
pub mod io;
pub mod level;

#[doc(hidden)]
pub mod prelude;

pub use chart::{ChartParser, MISSING_BAR_DIAGNOSTIC, ParseError, ParseResult, SusParser};
pub use io::{gunzip, gzip, read_to_string};
pub use level::{LevelData, LevelDataEntity, LevelDataValue};
