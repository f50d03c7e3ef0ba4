//! Latest-summary tracking across snapshots.

use brickline_types::{BookSnapshot, OrderBookSummary};
use tracing::{debug, warn};

use crate::summary::{DEFAULT_DEPTH, SummaryError, summarize};

/// Result of feeding one snapshot to an [`OrderBookSummarizer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotOutcome {
    /// The snapshot replaced the previous summary.
    Updated(OrderBookSummary),
    /// The snapshot was rejected; the previous summary, if any, is kept.
    Stale(SummaryError),
}

impl SnapshotOutcome {
    /// Returns true if the snapshot was accepted.
    #[must_use]
    pub const fn is_updated(&self) -> bool {
        matches!(self, Self::Updated(_))
    }
}

/// Holds the most recent valid order book summary.
///
/// Every snapshot is a full replace. A snapshot with an empty side leaves
/// the previous summary in place and flags it stale.
#[derive(Debug, Clone)]
pub struct OrderBookSummarizer {
    depth: usize,
    latest: Option<OrderBookSummary>,
    stale: bool,
    rejected: u64,
}

impl Default for OrderBookSummarizer {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH)
    }
}

impl OrderBookSummarizer {
    /// Creates a summarizer that sums liquidity over the top `depth` levels.
    #[must_use]
    pub const fn new(depth: usize) -> Self {
        Self {
            depth,
            latest: None,
            stale: false,
            rejected: 0,
        }
    }

    /// Summarizes a snapshot and stores the result.
    pub fn update(&mut self, snapshot: &BookSnapshot) -> SnapshotOutcome {
        match summarize(
            &snapshot.bids,
            &snapshot.asks,
            self.depth,
            snapshot.observed_at,
        ) {
            Ok(summary) => {
                debug!(
                    spread = %summary.spread,
                    imbalance = %summary.imbalance,
                    "order book updated"
                );
                self.latest = Some(summary);
                self.stale = false;
                SnapshotOutcome::Updated(summary)
            }
            Err(e) => {
                warn!(error = %e, "order book snapshot rejected, keeping previous summary");
                self.stale = true;
                self.rejected += 1;
                SnapshotOutcome::Stale(e)
            }
        }
    }

    /// Returns the latest valid summary.
    #[must_use]
    pub const fn latest(&self) -> Option<&OrderBookSummary> {
        self.latest.as_ref()
    }

    /// Returns true if the most recent snapshot was rejected.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        self.stale
    }

    /// Number of snapshots rejected since creation or the last reset.
    #[must_use]
    pub const fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Returns the configured depth.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Drops the stored summary.
    pub fn reset(&mut self) {
        self.latest = None;
        self.stale = false;
        self.rejected = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::Side;
    use brickline_types::OrderBookLevel;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn snapshot(bid: Option<(i64, i64)>, ask: Option<(i64, i64)>) -> BookSnapshot {
        let side = |l: Option<(i64, i64)>| {
            l.map(|(p, q)| vec![OrderBookLevel::new(p.into(), q.into())])
                .unwrap_or_default()
        };
        BookSnapshot::new(side(bid), side(ask), Utc::now())
    }

    #[test]
    fn test_update_replaces_summary() {
        let mut s = OrderBookSummarizer::default();
        assert!(s.latest().is_none());

        assert!(s.update(&snapshot(Some((100, 1)), Some((101, 1)))).is_updated());
        assert!(s.update(&snapshot(Some((200, 1)), Some((202, 1)))).is_updated());

        let latest = s.latest().unwrap();
        assert_eq!(latest.best_bid.price, dec!(200));
        assert_eq!(latest.spread, dec!(2));
        assert!(!s.is_stale());
    }

    #[test]
    fn test_empty_side_keeps_previous() {
        let mut s = OrderBookSummarizer::new(5);
        s.update(&snapshot(Some((100, 1)), Some((101, 1))));
        let before = *s.latest().unwrap();

        let outcome = s.update(&snapshot(Some((100, 1)), None));
        assert_eq!(outcome, SnapshotOutcome::Stale(SummaryError::EmptySide(Side::Ask)));
        assert!(s.is_stale());
        assert_eq!(s.rejected(), 1);
        assert_eq!(s.latest(), Some(&before));

        s.update(&snapshot(Some((100, 1)), Some((102, 1))));
        assert!(!s.is_stale());
        assert_eq!(s.latest().unwrap().spread, dec!(2));
    }

    #[test]
    fn test_stale_before_first_summary() {
        let mut s = OrderBookSummarizer::default();
        assert!(!s.update(&snapshot(None, None)).is_updated());
        assert!(s.latest().is_none());
        assert!(s.is_stale());
    }

    #[test]
    fn test_reset() {
        let mut s = OrderBookSummarizer::default();
        s.update(&snapshot(Some((100, 1)), Some((101, 1))));
        s.reset();
        assert!(s.latest().is_none());
        assert_eq!(s.depth(), DEFAULT_DEPTH);
    }
}
