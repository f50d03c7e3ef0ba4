//! Tick-to-Renko state machine.

use brickline_types::{BlockSize, Direction, RenkoBlock, Reversal, TickError, validate_price};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

/// Lifecycle of a [`RenkoAggregator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregatorState {
    /// No block has been formed or seeded yet.
    Unseeded,
    /// Tracking price relative to the last close, in the given direction.
    Tracking(Direction),
}

/// Streaming Renko block aggregator.
///
/// Emits at most one block per tick. A continuation needs the price to
/// move one block size beyond the last close; a reversal needs two.
#[derive(Debug, Clone)]
pub struct RenkoAggregator {
    block_size: BlockSize,
    last_close: Option<Decimal>,
    direction: Option<Direction>,
    accumulated_volume: Decimal,
    emitted_count: u64,
}

impl RenkoAggregator {
    /// Creates an unseeded aggregator.
    #[must_use]
    pub const fn new(block_size: BlockSize) -> Self {
        Self {
            block_size,
            last_close: None,
            direction: None,
            accumulated_volume: Decimal::ZERO,
            emitted_count: 0,
        }
    }

    /// Returns the configured block size.
    #[must_use]
    pub const fn block_size(&self) -> BlockSize {
        self.block_size
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> AggregatorState {
        match self.direction {
            Some(direction) => AggregatorState::Tracking(direction),
            None => AggregatorState::Unseeded,
        }
    }

    /// Returns the close of the last emitted or seeded block.
    #[must_use]
    pub const fn last_close(&self) -> Option<Decimal> {
        self.last_close
    }

    /// Returns the direction of the last emitted or seeded block.
    #[must_use]
    pub const fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Returns volume not yet attributed to a block.
    #[must_use]
    pub const fn accumulated_volume(&self) -> Decimal {
        self.accumulated_volume
    }

    /// Returns the sequence index the next block will carry.
    #[must_use]
    pub const fn emitted_count(&self) -> u64 {
        self.emitted_count
    }

    /// Processes one tick.
    ///
    /// `volume` is the quote volume of the trade, computed by the caller.
    /// Returns `Ok(Some(block))` when the tick completes a block; the block
    /// carries all volume accumulated since the previous one.
    ///
    /// # Errors
    ///
    /// Rejects a non-positive price, a negative volume, or a price whose
    /// block edges overflow. Rejected ticks leave the state untouched.
    pub fn on_tick(
        &mut self,
        price: Decimal,
        volume: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<RenkoBlock>, TickError> {
        validate_price(price)?;
        if volume < Decimal::ZERO {
            return Err(TickError::NegativeQuantity(volume));
        }

        let transition = self.transition(price)?;
        self.accumulated_volume = self.accumulated_volume.saturating_add(volume);

        let Some((open, close, reversal)) = transition else {
            return Ok(None);
        };

        let block = RenkoBlock::span(self.emitted_count, open, close, reversal, timestamp)
            .with_volume(self.accumulated_volume);
        self.last_close = Some(close);
        self.direction = Some(block.direction);
        self.accumulated_volume = Decimal::ZERO;
        self.emitted_count += 1;

        debug!(
            index = block.sequence_index,
            open = %block.open,
            close = %block.close,
            direction = %block.direction,
            reversal = block.reversal.code(),
            "renko block emitted"
        );
        Ok(Some(block))
    }

    /// Works out which block, if any, `price` completes. Pure.
    fn transition(&self, price: Decimal) -> Result<Option<(Decimal, Decimal, Reversal)>, TickError> {
        let size = self.block_size.get();
        let out_of_range = || TickError::OutOfRange(price);

        let (Some(last), Some(direction)) = (self.last_close, self.direction) else {
            let baseline = price
                .checked_div(size)
                .map(|q| q.floor())
                .and_then(|q| q.checked_mul(size))
                .ok_or_else(out_of_range)?;
            let top = baseline.checked_add(size).ok_or_else(out_of_range)?;
            return Ok(Some((baseline, top, Reversal::None)));
        };

        let step = |d: Direction| match d {
            Direction::Up => last.checked_add(size),
            Direction::Down => last.checked_sub(size),
        };
        let moved = price.checked_sub(last).ok_or_else(out_of_range)?;
        let reversal = self.block_size.reversal_threshold();

        let (next, flag) = match direction {
            Direction::Up if moved >= size => (Direction::Up, Reversal::None),
            Direction::Up if moved <= -reversal => (Direction::Down, Reversal::DownReversal),
            Direction::Down if moved <= -size => (Direction::Down, Reversal::None),
            Direction::Down if moved >= reversal => (Direction::Up, Reversal::UpReversal),
            _ => return Ok(None),
        };
        let close = step(next).ok_or_else(out_of_range)?;
        Ok(Some((last, close, flag)))
    }

    /// Restores state from previously emitted blocks in ascending order.
    ///
    /// The last block is taken as ground truth; nothing is recomputed. An
    /// empty history is equivalent to [`reset`](Self::reset), and so is a
    /// history whose last block was built with a different block size.
    /// Returns true when the series continues from `history`.
    pub fn seed(&mut self, history: &[RenkoBlock]) -> bool {
        let Some(last) = history.last() else {
            self.reset();
            return false;
        };
        if last.body() != self.block_size.get() {
            warn!(
                history_size = %last.body(),
                block_size = %self.block_size,
                "history was built with another block size, starting a new series"
            );
            self.reset();
            return false;
        }
        self.last_close = Some(last.close);
        self.direction = Some(last.direction);
        self.accumulated_volume = Decimal::ZERO;
        self.emitted_count = history.len() as u64;
        info!(
            blocks = history.len(),
            last_close = %last.close,
            direction = %last.direction,
            "renko aggregator seeded"
        );
        true
    }

    /// Changes the block size and restarts from the unseeded state,
    /// discarding accumulated volume.
    pub fn reconfigure(&mut self, block_size: BlockSize) {
        info!(from = %self.block_size, to = %block_size, "renko block size changed");
        self.block_size = block_size;
        self.reset();
    }

    /// Returns to the unseeded state.
    pub const fn reset(&mut self) {
        self.last_close = None;
        self.direction = None;
        self.accumulated_volume = Decimal::ZERO;
        self.emitted_count = 0;
    }
}
