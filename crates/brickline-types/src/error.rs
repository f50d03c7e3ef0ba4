//! Error types for brickline.

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias for brickline operations.
pub type Result<T> = std::result::Result<T, BricklineError>;

/// Errors that can occur while building and feeding the Renko engine.
#[derive(Error, Debug)]
pub enum BricklineError {
    /// A tick was rejected.
    #[error(transparent)]
    Tick(#[from] TickError),

    /// Invalid block size.
    #[error(transparent)]
    BlockSize(#[from] BlockSizeError),

    /// Instrument not found.
    #[error("Unknown instrument: {0}")]
    UnknownInstrument(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reasons a tick is rejected before it can touch any incremental state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TickError {
    /// Price is zero or negative.
    #[error("Invalid tick price {0}: must be greater than zero")]
    NonPositivePrice(Decimal),

    /// Quantity (or derived volume) is negative.
    #[error("Invalid tick volume {0}: must not be negative")]
    NegativeQuantity(Decimal),

    /// A floating-point input was NaN, infinite or out of decimal range.
    #[error("Invalid tick {0}: not a finite number")]
    NonFinite(&'static str),

    /// Price is so large that the next block edge overflows the decimal range.
    #[error("Tick price {0} is outside the representable block range")]
    OutOfRange(Decimal),
}

/// Error for invalid Renko block sizes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockSizeError {
    /// Block size is zero or negative.
    #[error("Invalid block size {0}: must be greater than zero")]
    NonPositive(Decimal),

    /// Block size is so large that a reversal move overflows.
    #[error("Invalid block size {0}: twice the size must be representable")]
    TooLarge(Decimal),

    /// Block size string could not be parsed.
    #[error("Invalid block size '{0}': expected a decimal number or a preset name")]
    Unparseable(String),
}
