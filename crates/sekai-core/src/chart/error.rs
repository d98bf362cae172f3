//! Chart parsing error types.

/// Diagnostic emitted when a note lies before the first bar-length definition.
pub const MISSING_BAR_DIAGNOSTIC: &str = "Unexpected missing bar";

/// Result type for chart parsing.
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors that can occur while parsing a chart file.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// A note or event references a measure with no preceding bar length.
    #[error("Unexpected missing bar: measure {measure} (line {line})")]
    MissingBar { measure: u32, line: usize },

    /// A numeric field could not be parsed.
    #[error("invalid number `{value}` (line {line})")]
    InvalidNumber { value: String, line: usize },

    /// A BPM change references an undefined BPM slot.
    #[error("undefined BPM slot `{slot}` (line {line})")]
    UnknownBpm { slot: String, line: usize },

    /// Note data has an odd number of characters or an invalid digit.
    #[error("malformed note data `{data}` (line {line})")]
    MalformedData { data: String, line: usize },

    /// A slide channel was left open at the end of the chart.
    #[error("slide on channel `{channel}` has no end")]
    UnterminatedSlide { channel: char },

    /// A slide step or end appeared without a start.
    #[error("slide note on channel `{channel}` has no start (tick {tick})")]
    OrphanSlideNote { channel: char, tick: f64 },

    /// The requested ticks-per-beat resolution is unusable.
    #[error("invalid ticks per beat `{0}`")]
    InvalidTicksPerBeat(String),

    /// Any other parser failure.
    #[error("{0}")]
    Other(String),
}

impl ParseError {
    /// Creates an error carrying only a message.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Returns `true` if the message carries the missing-bar diagnostic.
    ///
    /// The match is literal and case-sensitive.
    pub fn is_missing_bar(&self) -> bool {
        self.to_string().contains(MISSING_BAR_DIAGNOSTIC)
    }
}
