//! The persisted row for one Renko block.

use brickline_types::{OrderBookLevel, OrderBookSummary, RenkoBlock, Reversal};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors converting a stored row back into a block.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The reversal column held something other than `-1`, `0` or `1`.
    #[error("Unknown reversal code {0}")]
    UnknownReversal(i8),

    /// `open` and `close` are equal, so the row has no direction.
    #[error("Block opening and closing at {0} has no body")]
    EmptyBody(Decimal),
}

/// One Renko block as written to storage.
///
/// Field names match the external block table. The order book columns are
/// null when no summary was available at emission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    /// Opening price.
    pub open: Decimal,
    /// Closing price.
    pub close: Decimal,
    /// Upper edge.
    pub high: Decimal,
    /// Lower edge.
    pub low: Decimal,
    /// Accumulated quote volume.
    pub volume: Decimal,
    /// `-1` down reversal, `0` none, `1` up reversal.
    pub reversal: i8,
    /// Best bid price.
    pub best_bid_price: Option<Decimal>,
    /// Best bid quantity.
    pub best_bid_quantity: Option<Decimal>,
    /// Best ask price.
    pub best_ask_price: Option<Decimal>,
    /// Best ask quantity.
    pub best_ask_quantity: Option<Decimal>,
    /// Ask minus bid.
    pub spread: Option<Decimal>,
    /// Spread as a percentage of the best bid.
    pub spread_percentage: Option<Decimal>,
    /// Bid-side quote liquidity.
    pub bid_liquidity: Option<Decimal>,
    /// Ask-side quote liquidity.
    pub ask_liquidity: Option<Decimal>,
    /// Combined liquidity.
    pub total_liquidity: Option<Decimal>,
    /// Signed liquidity imbalance fraction.
    pub imbalance: Option<Decimal>,
    /// Quantity-weighted mid price.
    pub weighted_mid_price: Option<Decimal>,
    /// Emission time.
    pub created_at: DateTime<Utc>,
}

impl BlockRecord {
    /// Column names in storage order.
    pub const COLUMNS: [&'static str; 18] = [
        "open",
        "close",
        "high",
        "low",
        "volume",
        "reversal",
        "best_bid_price",
        "best_bid_quantity",
        "best_ask_price",
        "best_ask_quantity",
        "spread",
        "spread_percentage",
        "bid_liquidity",
        "ask_liquidity",
        "total_liquidity",
        "imbalance",
        "weighted_mid_price",
        "created_at",
    ];

    /// Returns the order book columns as a summary when all are present.
    #[must_use]
    pub fn order_book(&self) -> Option<OrderBookSummary> {
        Some(OrderBookSummary {
            best_bid: OrderBookLevel::new(self.best_bid_price?, self.best_bid_quantity?),
            best_ask: OrderBookLevel::new(self.best_ask_price?, self.best_ask_quantity?),
            spread: self.spread?,
            spread_pct: self.spread_percentage?,
            bid_liquidity: self.bid_liquidity?,
            ask_liquidity: self.ask_liquidity?,
            total_liquidity: self.total_liquidity?,
            imbalance: self.imbalance?,
            weighted_mid_price: self.weighted_mid_price?,
            observed_at: self.created_at,
        })
    }

    /// Rebuilds the block this row was written from.
    ///
    /// The RSI is not persisted and comes back as `None`.
    ///
    /// # Errors
    ///
    /// Fails on an unknown reversal code or a zero-height block.
    pub fn to_block(&self, sequence_index: u64) -> Result<RenkoBlock, RecordError> {
        let reversal =
            Reversal::from_code(self.reversal).ok_or(RecordError::UnknownReversal(self.reversal))?;
        if self.open == self.close {
            return Err(RecordError::EmptyBody(self.open));
        }
        Ok(
            RenkoBlock::span(sequence_index, self.open, self.close, reversal, self.created_at)
                .with_volume(self.volume)
                .with_order_book(self.order_book()),
        )
    }

    /// Renders every column as text, nulls as empty strings.
    pub(crate) fn cells(&self) -> [String; 18] {
        let opt = |v: Option<Decimal>| v.map(|d| d.to_string()).unwrap_or_default();
        [
            self.open.to_string(),
            self.close.to_string(),
            self.high.to_string(),
            self.low.to_string(),
            self.volume.to_string(),
            self.reversal.to_string(),
            opt(self.best_bid_price),
            opt(self.best_bid_quantity),
            opt(self.best_ask_price),
            opt(self.best_ask_quantity),
            opt(self.spread),
            opt(self.spread_percentage),
            opt(self.bid_liquidity),
            opt(self.ask_liquidity),
            opt(self.total_liquidity),
            opt(self.imbalance),
            opt(self.weighted_mid_price),
            self.created_at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        ]
    }
}

impl From<&RenkoBlock> for BlockRecord {
    fn from(block: &RenkoBlock) -> Self {
        let book = block.order_book.as_ref();
        Self {
            open: block.open,
            close: block.close,
            high: block.high,
            low: block.low,
            volume: block.volume,
            reversal: block.reversal.code(),
            best_bid_price: book.map(|b| b.best_bid.price),
            best_bid_quantity: book.map(|b| b.best_bid.quantity),
            best_ask_price: book.map(|b| b.best_ask.price),
            best_ask_quantity: book.map(|b| b.best_ask.quantity),
            spread: book.map(|b| b.spread),
            spread_percentage: book.map(|b| b.spread_pct),
            bid_liquidity: book.map(|b| b.bid_liquidity),
            ask_liquidity: book.map(|b| b.ask_liquidity),
            total_liquidity: book.map(|b| b.total_liquidity),
            imbalance: book.map(|b| b.imbalance),
            weighted_mid_price: book.map(|b| b.weighted_mid_price),
            created_at: block.created_at,
        }
    }
}

/// Converts stored rows into a block series for seeding, numbering them
/// from zero in the order given.
///
/// # Errors
///
/// Returns the first row that cannot be converted.
pub fn records_to_blocks(records: &[BlockRecord]) -> Result<Vec<RenkoBlock>, RecordError> {
    records
        .iter()
        .zip(0u64..)
        .map(|(record, index)| record.to_block(index))
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use brickline_types::Direction;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    pub(crate) fn sample_block(with_book: bool) -> RenkoBlock {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 12, 30, 45).unwrap();
        let book = with_book.then(|| OrderBookSummary {
            best_bid: OrderBookLevel::new(dec!(119.5), dec!(2)),
            best_ask: OrderBookLevel::new(dec!(120.5), dec!(1)),
            spread: dec!(1),
            spread_pct: dec!(0.8368),
            bid_liquidity: dec!(239),
            ask_liquidity: dec!(120.5),
            total_liquidity: dec!(359.5),
            imbalance: dec!(0.3296),
            weighted_mid_price: dec!(120.1667),
            observed_at: ts,
        });
        RenkoBlock::span(3, dec!(110), dec!(120), Reversal::UpReversal, ts)
            .with_volume(dec!(1520.75))
            .with_rsi(Some(dec!(61.2)))
            .with_order_book(book)
    }

    #[test]
    fn test_from_block() {
        let record = BlockRecord::from(&sample_block(true));
        assert_eq!(record.reversal, 1);
        assert_eq!(record.high, dec!(120));
        assert_eq!(record.best_bid_quantity, Some(dec!(2)));
        assert_eq!(record.imbalance, Some(dec!(0.3296)));
    }

    #[test]
    fn test_to_block_restores_series_fields() {
        let original = sample_block(true);
        let block = BlockRecord::from(&original).to_block(7).unwrap();
        assert_eq!(block.sequence_index, 7);
        assert_eq!(block.direction, Direction::Up);
        assert_eq!(block.reversal, Reversal::UpReversal);
        assert_eq!(block.volume, original.volume);
        assert_eq!(block.order_book, original.order_book);
        assert_eq!(block.rsi, None);
    }

    #[test]
    fn test_missing_book_columns() {
        let record = BlockRecord::from(&sample_block(false));
        assert!(record.spread.is_none());
        assert!(record.order_book().is_none());
        assert!(record.cells()[10].is_empty());
    }

    #[test]
    fn test_bad_rows_rejected() {
        let mut record = BlockRecord::from(&sample_block(false));
        record.reversal = 2;
        assert_eq!(record.to_block(0), Err(RecordError::UnknownReversal(2)));

        record.reversal = 0;
        record.close = record.open;
        assert!(matches!(record.to_block(0), Err(RecordError::EmptyBody(_))));
    }

    #[test]
    fn test_columns_match_serialized_fields() {
        let value = serde_json::to_value(BlockRecord::from(&sample_block(true))).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), BlockRecord::COLUMNS.len());
        for column in BlockRecord::COLUMNS {
            assert!(object.contains_key(column), "missing {column}");
        }
    }
}
