//! Order book levels and snapshot summaries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single price level on one side of the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookLevel {
    /// Level price.
    pub price: Decimal,
    /// Resting quantity at this price.
    pub quantity: Decimal,
}

impl OrderBookLevel {
    /// Creates a new level.
    #[must_use]
    pub const fn new(price: Decimal, quantity: Decimal) -> Self {
        Self { price, quantity }
    }

    /// Returns the quote value resting at this level (`price * quantity`).
    ///
    /// Saturates to zero on overflow.
    #[must_use]
    pub fn notional(&self) -> Decimal {
        self.price.checked_mul(self.quantity).unwrap_or(Decimal::ZERO)
    }
}

/// Derived statistics of one order book snapshot.
///
/// Recomputed wholesale on every snapshot. `imbalance` is a signed fraction
/// in `[-1, 1]`; `spread_pct` is a percentage of the best bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookSummary {
    /// Best (highest) bid.
    pub best_bid: OrderBookLevel,
    /// Best (lowest) ask.
    pub best_ask: OrderBookLevel,
    /// `best_ask.price - best_bid.price`.
    pub spread: Decimal,
    /// Spread as a percentage of the best bid price.
    pub spread_pct: Decimal,
    /// Quote liquidity on the bid side over the snapshot depth.
    pub bid_liquidity: Decimal,
    /// Quote liquidity on the ask side over the snapshot depth.
    pub ask_liquidity: Decimal,
    /// `bid_liquidity + ask_liquidity`.
    pub total_liquidity: Decimal,
    /// `(bid_liquidity - ask_liquidity) / total_liquidity`.
    pub imbalance: Decimal,
    /// Quantity-weighted mid price.
    pub weighted_mid_price: Decimal,
    /// When the snapshot was observed.
    pub observed_at: DateTime<Utc>,
}

impl OrderBookSummary {
    /// Returns the simple midpoint of the best bid and ask.
    #[must_use]
    pub fn mid_price(&self) -> Decimal {
        (self.best_bid.price + self.best_ask.price) / Decimal::TWO
    }

    /// Returns true when bid liquidity exceeds ask liquidity.
    #[must_use]
    pub fn is_bid_heavy(&self) -> bool {
        self.imbalance > Decimal::ZERO
    }
}

/// A full-replace snapshot of the top of the book, best price first on
/// each side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSnapshot {
    /// Bid levels, highest price first.
    pub bids: Vec<OrderBookLevel>,
    /// Ask levels, lowest price first.
    pub asks: Vec<OrderBookLevel>,
    /// When the snapshot was received.
    pub observed_at: DateTime<Utc>,
}

impl BookSnapshot {
    /// Creates a new snapshot.
    #[must_use]
    pub const fn new(
        bids: Vec<OrderBookLevel>,
        asks: Vec<OrderBookLevel>,
        observed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            bids,
            asks,
            observed_at,
        }
    }

    /// Returns true when either side has no levels.
    #[must_use]
    pub fn is_one_sided(&self) -> bool {
        self.bids.is_empty() || self.asks.is_empty()
    }
}
