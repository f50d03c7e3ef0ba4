//! Feed error types.

use thiserror::Error;

/// Errors reading or parsing the market data feed.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Malformed JSON or an unrecognised message shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An event time outside the representable range.
    #[error("Invalid event time {0}ms")]
    Timestamp(i64),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A recorded feed line failed to parse.
    #[error("Line {line}: {source}")]
    Line {
        /// One-based line number.
        line: usize,
        /// Underlying failure.
        #[source]
        source: Box<FeedError>,
    },

    /// The sink task panicked or was cancelled.
    #[error("Sink task failed: {0}")]
    SinkTask(String),
}
