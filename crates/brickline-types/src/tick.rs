//! Trade tick representation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

use crate::TickError;

/// A single executed trade delivered by the tick source.
///
/// Ticks are ephemeral: they drive the RSI calculator and the Renko
/// aggregator and are never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    /// Trade price.
    pub price: Decimal,
    /// Traded quantity in base units.
    pub quantity: Decimal,
    /// Exchange timestamp of the trade (UTC).
    pub timestamp: DateTime<Utc>,
}

impl Tick {
    /// Creates a new tick without validating it.
    #[must_use]
    pub const fn new(price: Decimal, quantity: Decimal, timestamp: DateTime<Utc>) -> Self {
        Self {
            price,
            quantity,
            timestamp,
        }
    }

    /// Creates a tick from floating-point inputs.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::NonFinite`] when either value is NaN, infinite or
    /// outside the decimal range, and the errors of [`Tick::validate`]
    /// otherwise.
    pub fn try_from_f64(
        price: f64,
        quantity: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, TickError> {
        let price = Decimal::from_f64(price).ok_or(TickError::NonFinite("price"))?;
        let quantity = Decimal::from_f64(quantity).ok_or(TickError::NonFinite("quantity"))?;
        let tick = Self::new(price, quantity, timestamp);
        tick.validate()?;
        Ok(tick)
    }

    /// Checks that the price is strictly positive and the quantity is not
    /// negative.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), TickError> {
        validate_price(self.price)?;
        if self.quantity < Decimal::ZERO {
            return Err(TickError::NegativeQuantity(self.quantity));
        }
        Ok(())
    }

    /// Returns the quote-currency notional of the trade (`price * quantity`).
    ///
    /// Saturates to zero if the product overflows the decimal range.
    #[must_use]
    pub fn notional(&self) -> Decimal {
        self.price.checked_mul(self.quantity).unwrap_or(Decimal::ZERO)
    }
}

/// Rejects prices that are zero or negative.
///
/// # Errors
///
/// Returns [`TickError::NonPositivePrice`] for any price `<= 0`.
pub fn validate_price(price: Decimal) -> Result<(), TickError> {
    if price <= Decimal::ZERO {
        return Err(TickError::NonPositivePrice(price));
    }
    Ok(())
}
