//! Running counts over an emitted block series.

use brickline_types::{Direction, RenkoBlock};
use serde::{Deserialize, Serialize};

/// Block counts by direction and reversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenkoStats {
    /// Total blocks.
    pub total: u64,
    /// UP blocks.
    pub up: u64,
    /// DOWN blocks.
    pub down: u64,
    /// Blocks flagged as a reversal in either direction.
    pub reversals: u64,
    /// Direction of the most recent block.
    pub last_direction: Option<Direction>,
}

impl RenkoStats {
    /// Counts the blocks of an existing series.
    #[must_use]
    pub fn from_blocks<'a>(blocks: impl IntoIterator<Item = &'a RenkoBlock>) -> Self {
        let mut stats = Self::default();
        for block in blocks {
            stats.record(block);
        }
        stats
    }

    /// Adds one block.
    pub const fn record(&mut self, block: &RenkoBlock) {
        self.total += 1;
        match block.direction {
            Direction::Up => self.up += 1,
            Direction::Down => self.down += 1,
        }
        if block.reversal.is_reversal() {
            self.reversals += 1;
        }
        self.last_direction = Some(block.direction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brickline_types::Reversal;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_blocks() {
        let blocks = [
            RenkoBlock::span(0, dec!(100), dec!(110), Reversal::None, Utc::now()),
            RenkoBlock::span(1, dec!(110), dec!(120), Reversal::None, Utc::now()),
            RenkoBlock::span(2, dec!(120), dec!(110), Reversal::DownReversal, Utc::now()),
        ];
        let stats = RenkoStats::from_blocks(&blocks);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.up, 2);
        assert_eq!(stats.down, 1);
        assert_eq!(stats.reversals, 1);
        assert_eq!(stats.last_direction, Some(Direction::Down));
    }
}
