//! Tradable instrument definitions.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A trading pair whose trade stream can be aggregated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Exchange stream symbol (e.g., "btcusdt").
    symbol: String,
    /// Human-readable name (e.g., "Bitcoin/USDT").
    name: String,
    /// Number of decimal places the exchange quotes prices with.
    price_decimals: u32,
}

impl Instrument {
    /// Creates a new instrument.
    #[must_use]
    pub fn new(symbol: impl Into<String>, name: impl Into<String>, price_decimals: u32) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            price_decimals,
        }
    }

    /// Returns the stream symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the quoted price precision.
    #[must_use]
    pub const fn price_decimals(&self) -> u32 {
        self.price_decimals
    }

    /// Rounds a price to the instrument's quoted precision (half-even).
    #[must_use]
    pub fn quantize(&self, price: Decimal) -> Decimal {
        price.round_dp_with_strategy(self.price_decimals, RoundingStrategy::MidpointNearestEven)
    }

    /// Returns the smallest price increment.
    #[must_use]
    pub fn tick_size(&self) -> Decimal {
        Decimal::new(1, self.price_decimals)
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.symbol)
    }
}
