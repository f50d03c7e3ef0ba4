//! Benchmark utilities for brickline.
//!
//! Synthetic feeds are generated from a fixed-seed random walk so every run
//! measures the same workload.

use brickline_lib::RsiError;
use brickline_lib::prelude::*;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use rust_decimal::Decimal;
use std::time::{Duration, Instant};

/// Small linear congruential generator. Not for anything but benchmarks.
#[derive(Debug, Clone)]
pub struct Lcg(u64);

impl Lcg {
    /// Creates a generator from a seed.
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the next raw value.
    pub const fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }
}

fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Generates `n` trades walking from `start` in cent steps of up to a dollar,
/// one millisecond apart. Prices never fall below one dollar.
pub fn random_walk(n: usize, seed: u64, start: Decimal) -> Vec<Tick> {
    let mut rng = Lcg::new(seed);
    let mut price = start;
    let t0 = start_time();
    (0..n)
        .map(|i| {
            let cents = (rng.next_u64() % 201) as i64 - 100;
            price = (price + Decimal::new(cents, 2)).max(Decimal::ONE);
            let quantity = Decimal::new((rng.next_u64() % 1000 + 1) as i64, 3);
            Tick::new(price, quantity, t0 + ChronoDuration::milliseconds(i as i64))
        })
        .collect()
}

/// Builds a symmetric book of `levels` per side around `mid`, one cent apart.
pub fn book_snapshot(mid: Decimal, levels: usize, seed: u64) -> BookSnapshot {
    let mut rng = Lcg::new(seed);
    let cent = Decimal::new(1, 2);
    let mut side = |sign: Decimal| -> Vec<OrderBookLevel> {
        (1..=levels)
            .map(|i| {
                let price = mid + sign * cent * Decimal::from(i);
                let quantity = Decimal::new((rng.next_u64() % 5000 + 1) as i64, 3);
                OrderBookLevel::new(price, quantity)
            })
            .collect()
    };
    let bids = side(Decimal::NEGATIVE_ONE);
    let asks = side(Decimal::ONE);
    BookSnapshot::new(bids, asks, start_time())
}

/// Result of replaying a synthetic feed through the engine.
#[derive(Debug, Clone)]
pub struct ReplayResult {
    /// Block size used.
    pub block_size: BlockSize,
    /// Ticks processed.
    pub ticks: u64,
    /// Blocks emitted.
    pub blocks: u64,
    /// Wall time of the replay.
    pub duration: Duration,
}

impl ReplayResult {
    /// Ticks processed per second.
    pub fn ticks_per_sec(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 { self.ticks as f64 / secs } else { 0.0 }
    }
}

/// Replays `ticks` through a fresh engine, with a book snapshot every
/// `book_every` ticks (0 disables snapshots). Snapshots are built before
/// the clock starts.
///
/// # Errors
///
/// Returns an error if the default engine config is rejected.
pub fn replay(
    ticks: &[Tick],
    block_size: BlockSize,
    book_every: usize,
) -> std::result::Result<ReplayResult, RsiError> {
    let mut engine = RenkoEngine::new(EngineConfig::default().with_block_size(block_size))?;
    let snapshots: Vec<(usize, BookSnapshot)> = if book_every == 0 {
        Vec::new()
    } else {
        ticks
            .iter()
            .enumerate()
            .step_by(book_every)
            .map(|(i, tick)| (i, book_snapshot(tick.price, 10, i as u64)))
            .collect()
    };
    let mut pending = snapshots.iter().peekable();

    let start = Instant::now();
    let mut blocks = 0;
    for (i, tick) in ticks.iter().enumerate() {
        if let Some((_, snapshot)) = pending.next_if(|(at, _)| *at == i) {
            engine.on_book_snapshot(snapshot);
        }
        if let Ok(Some(_)) = engine.on_tick(tick) {
            blocks += 1;
        }
    }

    Ok(ReplayResult {
        block_size,
        ticks: ticks.len() as u64,
        blocks,
        duration: start.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_counts_blocks() {
        let ticks = random_walk(5_000, 7, Decimal::new(10_000, 0));
        let size = BlockSize::new(Decimal::new(5, 1)).unwrap();
        let plain = replay(&ticks, size, 0).unwrap();
        let with_books = replay(&ticks, size, 100).unwrap();
        assert_eq!(plain.ticks, 5_000);
        assert!(plain.blocks > 0 && plain.blocks <= plain.ticks);
        assert_eq!(plain.blocks, with_books.blocks);
    }
}
