//! Chart parsing.
//!
//! [`ChartParser`] is the seam between the level service and a concrete chart
//! format. [`SusParser`] implements it for SUS files.

mod error;
mod sus;

pub use error::{MISSING_BAR_DIAGNOSTIC, ParseError, ParseResult};
pub use sus::SusParser;

use crate::level::LevelData;

/// Converts the full text of a chart file into [`LevelData`].
pub trait ChartParser: Send + Sync {
    /// Parses `text` into level data.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] whose message describes the first problem found.
    fn parse(&self, text: &str) -> ParseResult<LevelData>;
}

impl<F> ChartParser for F
where
    F: Fn(&str) -> ParseResult<LevelData> + Send + Sync,
{
    fn parse(&self, text: &str) -> ParseResult<LevelData> {
        self(text)
    }
}
