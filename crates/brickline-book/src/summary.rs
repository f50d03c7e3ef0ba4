//! Snapshot reduction.

use brickline_types::{OrderBookLevel, OrderBookSummary};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

/// Levels per side in the exchange's partial depth stream.
pub const DEFAULT_DEPTH: usize = 10;

/// Side of the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Resting buy orders.
    Bid,
    /// Resting sell orders.
    Ask,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bid => write!(f, "bid"),
            Self::Ask => write!(f, "ask"),
        }
    }
}

/// Reasons a snapshot cannot be summarized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SummaryError {
    /// One side of the book had no levels.
    #[error("order book {0} side is empty")]
    EmptySide(Side),

    /// The requested depth was zero.
    #[error("summary depth must be greater than zero")]
    ZeroDepth,
}

/// Reduces one snapshot to its summary statistics.
///
/// Liquidity is summed over the first `min(depth, len)` levels of each side.
/// Arithmetic overflow yields zero for the affected field rather than an
/// error.
///
/// # Errors
///
/// Returns [`SummaryError::EmptySide`] when either side has no levels and
/// [`SummaryError::ZeroDepth`] when `depth` is zero.
pub fn summarize(
    bids: &[OrderBookLevel],
    asks: &[OrderBookLevel],
    depth: usize,
    observed_at: DateTime<Utc>,
) -> Result<OrderBookSummary, SummaryError> {
    if depth == 0 {
        return Err(SummaryError::ZeroDepth);
    }
    let best_bid = *bids.first().ok_or(SummaryError::EmptySide(Side::Bid))?;
    let best_ask = *asks.first().ok_or(SummaryError::EmptySide(Side::Ask))?;

    let spread = best_ask
        .price
        .checked_sub(best_bid.price)
        .unwrap_or(Decimal::ZERO);
    let spread_pct = if best_bid.price > Decimal::ZERO {
        spread
            .checked_div(best_bid.price)
            .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    let bid_liquidity = liquidity(bids, depth);
    let ask_liquidity = liquidity(asks, depth);
    let total_liquidity = bid_liquidity
        .checked_add(ask_liquidity)
        .unwrap_or(Decimal::ZERO);
    let imbalance = if total_liquidity.is_zero() {
        Decimal::ZERO
    } else {
        bid_liquidity
            .checked_sub(ask_liquidity)
            .and_then(|d| d.checked_div(total_liquidity))
            .unwrap_or(Decimal::ZERO)
    };

    Ok(OrderBookSummary {
        best_bid,
        best_ask,
        spread,
        spread_pct,
        bid_liquidity,
        ask_liquidity,
        total_liquidity,
        imbalance,
        weighted_mid_price: weighted_mid(best_bid, best_ask),
        observed_at,
    })
}

fn liquidity(levels: &[OrderBookLevel], depth: usize) -> Decimal {
    levels
        .iter()
        .take(depth)
        .map(OrderBookLevel::notional)
        .try_fold(Decimal::ZERO, Decimal::checked_add)
        .unwrap_or(Decimal::ZERO)
}

/// Mid price weighted by the opposite side's quantity, so a heavy bid pulls
/// the estimate toward the ask. Falls back to the midpoint when both best
/// quantities are zero.
fn weighted_mid(bid: OrderBookLevel, ask: OrderBookLevel) -> Decimal {
    let midpoint = || {
        bid.price
            .checked_add(ask.price)
            .map(|s| s / Decimal::TWO)
            .unwrap_or(Decimal::ZERO)
    };
    let weight = bid.quantity.checked_add(ask.quantity);
    match weight {
        Some(w) if !w.is_zero() => bid
            .price
            .checked_mul(ask.quantity)
            .zip(ask.price.checked_mul(bid.quantity))
            .and_then(|(b, a)| b.checked_add(a))
            .and_then(|n| n.checked_div(w))
            .unwrap_or_else(midpoint),
        _ => midpoint(),
    }
}
