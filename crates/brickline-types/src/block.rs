//! Renko block data structure.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::OrderBookSummary;

/// Direction of a Renko block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Close above open.
    Up,
    /// Close below open.
    Down,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    /// Returns the direction as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a block reversed the direction of the block before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Reversal {
    /// Continuation (or the seeding block).
    #[default]
    None,
    /// A DOWN series turned UP.
    UpReversal,
    /// An UP series turned DOWN.
    DownReversal,
}

impl Reversal {
    /// Returns the integer code used by the external storage contract:
    /// `-1` for a down reversal, `0` for none, `1` for an up reversal.
    #[must_use]
    pub const fn code(self) -> i8 {
        match self {
            Self::DownReversal => -1,
            Self::None => 0,
            Self::UpReversal => 1,
        }
    }

    /// Decodes a storage code. Unknown codes map to `None`.
    #[must_use]
    pub const fn from_code(code: i8) -> Option<Self> {
        match code {
            -1 => Some(Self::DownReversal),
            0 => Some(Self::None),
            1 => Some(Self::UpReversal),
            _ => None,
        }
    }

    /// Returns true for either reversal kind.
    #[must_use]
    pub const fn is_reversal(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Returns the reversal that turns the series into `direction`.
    #[must_use]
    pub const fn into_direction(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::UpReversal,
            Direction::Down => Self::DownReversal,
        }
    }
}

/// A completed Renko block.
///
/// Created only by the aggregator on a completed transition and never
/// mutated afterwards. `high`/`low` are always `max`/`min` of `open` and
/// `close`, and `|close - open|` equals the block size exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenkoBlock {
    /// Zero-based position in the emitted series.
    pub sequence_index: u64,
    /// Opening price (the previous block's close).
    pub open: Decimal,
    /// Closing price.
    pub close: Decimal,
    /// Upper edge of the block.
    pub high: Decimal,
    /// Lower edge of the block.
    pub low: Decimal,
    /// Block direction.
    pub direction: Direction,
    /// Quote volume accumulated since the previous block.
    pub volume: Decimal,
    /// Reversal flag.
    pub reversal: Reversal,
    /// RSI at emission time, `None` while the indicator warms up.
    pub rsi: Option<Decimal>,
    /// Most recent order book summary at emission time.
    pub order_book: Option<OrderBookSummary>,
    /// Timestamp of the tick that completed the block.
    pub created_at: DateTime<Utc>,
}

impl RenkoBlock {
    /// Builds a block spanning `open` to `close`, deriving `high`, `low` and
    /// `direction` from the two edges.
    #[must_use]
    pub fn span(
        sequence_index: u64,
        open: Decimal,
        close: Decimal,
        reversal: Reversal,
        created_at: DateTime<Utc>,
    ) -> Self {
        let direction = if close >= open {
            Direction::Up
        } else {
            Direction::Down
        };
        Self {
            sequence_index,
            open,
            close,
            high: open.max(close),
            low: open.min(close),
            direction,
            volume: Decimal::ZERO,
            reversal,
            rsi: None,
            order_book: None,
            created_at,
        }
    }

    /// Sets the accumulated volume.
    #[must_use]
    pub const fn with_volume(mut self, volume: Decimal) -> Self {
        self.volume = volume;
        self
    }

    /// Attaches the RSI reading.
    #[must_use]
    pub const fn with_rsi(mut self, rsi: Option<Decimal>) -> Self {
        self.rsi = rsi;
        self
    }

    /// Attaches the order book summary.
    #[must_use]
    pub fn with_order_book(mut self, summary: Option<OrderBookSummary>) -> Self {
        self.order_book = summary;
        self
    }

    /// Returns the block height (`|close - open|`).
    #[must_use]
    pub fn body(&self) -> Decimal {
        (self.close - self.open).abs()
    }

    /// Returns true for an UP block.
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self.direction, Direction::Up)
    }
}
