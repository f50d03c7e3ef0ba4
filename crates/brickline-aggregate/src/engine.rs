//! Caller-owned context wiring ticks through the RSI and the aggregator.

use brickline_book::{DEFAULT_DEPTH, OrderBookSummarizer, SnapshotOutcome};
use brickline_indicator::{DEFAULT_PERIOD, RsiCalculator, RsiError};
use brickline_types::{BlockSize, BookSnapshot, OrderBookSummary, RenkoBlock, Tick, TickError};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::{RenkoAggregator, RenkoStats};

/// Settings for a [`RenkoEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Renko block height.
    pub block_size: BlockSize,
    /// RSI look-back.
    pub rsi_period: usize,
    /// Levels per side summed into order book liquidity.
    pub book_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            block_size: BlockSize::default(),
            rsi_period: DEFAULT_PERIOD,
            book_depth: DEFAULT_DEPTH,
        }
    }
}

impl EngineConfig {
    /// Sets the block size.
    #[must_use]
    pub const fn with_block_size(mut self, block_size: BlockSize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Sets the RSI period.
    #[must_use]
    pub const fn with_rsi_period(mut self, period: usize) -> Self {
        self.rsi_period = period;
        self
    }

    /// Sets the order book depth.
    #[must_use]
    pub const fn with_book_depth(mut self, depth: usize) -> Self {
        self.book_depth = depth;
        self
    }
}

/// Owns every piece of incremental state for one instrument.
///
/// Single writer: ticks and snapshots must be fed from one ordered queue.
/// Blocks returned by [`on_tick`](Self::on_tick) carry the RSI after that
/// tick and the latest order book summary, however old.
#[derive(Debug, Clone)]
pub struct RenkoEngine {
    aggregator: RenkoAggregator,
    rsi: RsiCalculator,
    book: OrderBookSummarizer,
    stats: RenkoStats,
    rejected_ticks: u64,
}

impl RenkoEngine {
    /// Creates an engine.
    ///
    /// # Errors
    ///
    /// Returns [`RsiError::ZeroPeriod`] if the RSI period is zero.
    pub fn new(config: EngineConfig) -> Result<Self, RsiError> {
        Ok(Self {
            aggregator: RenkoAggregator::new(config.block_size),
            rsi: RsiCalculator::new(config.rsi_period)?,
            book: OrderBookSummarizer::new(config.book_depth),
            stats: RenkoStats::default(),
            rejected_ticks: 0,
        })
    }

    /// Processes one trade.
    ///
    /// # Errors
    ///
    /// Returns the reason an invalid tick was rejected. Neither the RSI nor
    /// the aggregator is touched in that case.
    pub fn on_tick(&mut self, tick: &Tick) -> Result<Option<RenkoBlock>, TickError> {
        let result = tick
            .validate()
            .and_then(|()| self.aggregator.on_tick(tick.price, tick.notional(), tick.timestamp));
        let block = match result {
            Ok(block) => block,
            Err(e) => {
                self.rejected_ticks += 1;
                warn!(error = %e, price = %tick.price, "tick rejected");
                return Err(e);
            }
        };
        self.rsi.add_price(tick.price)?;

        Ok(block.map(|b| {
            let b = b
                .with_rsi(self.rsi.current())
                .with_order_book(self.book.latest().copied());
            self.stats.record(&b);
            b
        }))
    }

    /// Replaces the cached order book summary.
    pub fn on_book_snapshot(&mut self, snapshot: &BookSnapshot) -> SnapshotOutcome {
        self.book.update(snapshot)
    }

    /// Restores aggregator state and block counts from persisted history.
    ///
    /// History built with another block size is ignored and the series
    /// starts fresh. Returns true when the series continues from `history`.
    pub fn seed(&mut self, history: &[RenkoBlock]) -> bool {
        let seeded = self.aggregator.seed(history);
        self.stats = if seeded {
            RenkoStats::from_blocks(history)
        } else {
            RenkoStats::default()
        };
        seeded
    }

    /// Switches block size, restarting the block series and the RSI.
    ///
    /// The cached order book summary is kept; it describes the market, not
    /// the series.
    pub fn set_block_size(&mut self, block_size: BlockSize) {
        self.aggregator.reconfigure(block_size);
        self.rsi.reset();
        self.stats = RenkoStats::default();
    }

    /// Replaces the RSI calculator with a fresh one of the given period.
    ///
    /// # Errors
    ///
    /// Returns [`RsiError::ZeroPeriod`] and keeps the current calculator if
    /// `period` is zero.
    pub fn set_rsi_period(&mut self, period: usize) -> Result<(), RsiError> {
        self.rsi = RsiCalculator::new(period)?;
        info!(period, "rsi period changed");
        Ok(())
    }

    /// Returns the aggregator.
    #[must_use]
    pub const fn aggregator(&self) -> &RenkoAggregator {
        &self.aggregator
    }

    /// Returns the RSI calculator.
    #[must_use]
    pub const fn rsi(&self) -> &RsiCalculator {
        &self.rsi
    }

    /// Returns the latest order book summary.
    #[must_use]
    pub const fn order_book(&self) -> Option<&OrderBookSummary> {
        self.book.latest()
    }

    /// Returns true if the most recent snapshot was rejected.
    #[must_use]
    pub const fn is_book_stale(&self) -> bool {
        self.book.is_stale()
    }

    /// Returns block counts for the current series.
    #[must_use]
    pub const fn stats(&self) -> RenkoStats {
        self.stats
    }

    /// Returns the number of ticks rejected so far.
    #[must_use]
    pub const fn rejected_ticks(&self) -> u64 {
        self.rejected_ticks
    }

    /// Returns volume not yet attributed to a block.
    #[must_use]
    pub const fn pending_volume(&self) -> Decimal {
        self.aggregator.accumulated_volume()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brickline_types::OrderBookLevel;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn tick(price: Decimal, quantity: Decimal) -> Tick {
        Tick::new(price, quantity, Utc::now())
    }

    fn engine() -> RenkoEngine {
        let config = EngineConfig::default()
            .with_block_size(BlockSize::new(dec!(10)).unwrap())
            .with_rsi_period(2);
        RenkoEngine::new(config).unwrap()
    }

    #[test]
    fn test_zero_rsi_period_rejected() {
        let config = EngineConfig::default().with_rsi_period(0);
        assert_eq!(RenkoEngine::new(config).unwrap_err(), RsiError::ZeroPeriod);
    }

    #[test]
    fn test_volume_is_notional() {
        let mut e = engine();
        let block = e.on_tick(&tick(dec!(100), dec!(2))).unwrap().unwrap();
        assert_eq!(block.volume, dec!(200));
    }

    #[test]
    fn test_block_annotations() {
        let mut e = engine();
        let first = e.on_tick(&tick(dec!(100), dec!(1))).unwrap().unwrap();
        assert_eq!(first.rsi, None);
        assert_eq!(first.order_book, None);

        e.on_book_snapshot(&BookSnapshot::new(
            vec![OrderBookLevel::new(dec!(104), dec!(1))],
            vec![OrderBookLevel::new(dec!(105), dec!(1))],
            Utc::now(),
        ));
        e.on_tick(&tick(dec!(105), dec!(1))).unwrap();
        let block = e.on_tick(&tick(dec!(121), dec!(1))).unwrap().unwrap();

        assert_eq!(block.rsi, Some(dec!(100)));
        assert_eq!(block.order_book.unwrap().best_bid.price, dec!(104));
    }

    #[test]
    fn test_stale_snapshot_keeps_annotation() {
        let mut e = engine();
        e.on_book_snapshot(&BookSnapshot::new(
            vec![OrderBookLevel::new(dec!(99), dec!(1))],
            vec![OrderBookLevel::new(dec!(100), dec!(1))],
            Utc::now(),
        ));
        let outcome = e.on_book_snapshot(&BookSnapshot::new(vec![], vec![], Utc::now()));
        assert!(!outcome.is_updated());
        assert!(e.is_book_stale());

        let block = e.on_tick(&tick(dec!(100), dec!(1))).unwrap().unwrap();
        assert_eq!(block.order_book.unwrap().best_ask.price, dec!(100));
    }

    #[test]
    fn test_rejected_tick_touches_nothing() {
        let mut e = engine();
        e.on_tick(&tick(dec!(100), dec!(1))).unwrap();
        e.on_tick(&tick(dec!(102), dec!(1))).unwrap();

        assert!(e.on_tick(&tick(dec!(-5), dec!(1))).is_err());
        assert!(e.on_tick(&tick(dec!(130), dec!(-1))).is_err());
        assert_eq!(e.rejected_ticks(), 2);
        assert_eq!(e.pending_volume(), dec!(102));
        assert!(!e.rsi().is_warmed_up());
        assert_eq!(e.stats().total, 1);
    }

    #[test]
    fn test_reconfigure_resets_series() {
        let mut e = engine();
        e.on_tick(&tick(dec!(100), dec!(1))).unwrap();
        e.on_tick(&tick(dec!(105), dec!(1))).unwrap();
        e.set_block_size(BlockSize::new(dec!(5)).unwrap());

        assert_eq!(e.stats().total, 0);
        assert_eq!(e.pending_volume(), Decimal::ZERO);
        let block = e.on_tick(&tick(dec!(107), dec!(1))).unwrap().unwrap();
        assert_eq!((block.open, block.close), (dec!(105), dec!(110)));
        assert_eq!(block.sequence_index, 0);

        e.set_rsi_period(3).unwrap();
        assert_eq!(e.rsi().period(), 3);
        assert!(e.set_rsi_period(0).is_err());
        assert_eq!(e.rsi().period(), 3);
    }

    #[test]
    fn test_block_size_change_restarts_rsi() {
        let mut e = engine();
        for price in [dec!(100), dec!(101), dec!(102), dec!(103)] {
            e.on_tick(&tick(price, dec!(1))).unwrap();
        }
        assert!(e.rsi().is_warmed_up());

        e.set_block_size(BlockSize::new(dec!(5)).unwrap());
        assert!(!e.rsi().is_warmed_up());
        assert_eq!(e.rsi().history().len(), 0);
        assert_eq!(e.rsi().period(), 2);

        let block = e.on_tick(&tick(dec!(104), dec!(1))).unwrap().unwrap();
        assert_eq!(block.sequence_index, 0);
        assert_eq!(block.rsi, None);
    }
}
