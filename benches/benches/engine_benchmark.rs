//! Hot-path benchmarks for the Renko engine.
//!
//! Run with: `cargo bench --package brickline-bench`

use brickline_bench::{book_snapshot, random_walk};
use brickline_lib::prelude::*;
use brickline_lib::summarize;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rust_decimal::Decimal;
use std::hint::black_box;

const TICKS: usize = 100_000;

fn aggregator_benchmark(c: &mut Criterion) {
    let ticks = random_walk(TICKS, 7, Decimal::from(43_000));
    let mut group = c.benchmark_group("aggregator");
    group.throughput(Throughput::Elements(TICKS as u64));

    for units in [1u32, 10, 50] {
        let size = BlockSize::new(Decimal::from(units)).expect("valid block size");
        group.bench_with_input(BenchmarkId::new("on_tick", units), &size, |b, &size| {
            b.iter(|| {
                let mut aggregator = RenkoAggregator::new(size);
                for tick in &ticks {
                    let _ = black_box(aggregator.on_tick(
                        tick.price,
                        tick.notional(),
                        tick.timestamp,
                    ));
                }
                aggregator.emitted_count()
            });
        });
    }
    group.finish();
}

fn engine_benchmark(c: &mut Criterion) {
    let ticks = random_walk(TICKS, 11, Decimal::from(43_000));
    let snapshot = book_snapshot(Decimal::from(43_000), 20, 3);
    let mut group = c.benchmark_group("engine");
    group.throughput(Throughput::Elements(TICKS as u64));

    group.bench_function("on_tick", |b| {
        b.iter(|| {
            let mut engine = RenkoEngine::new(EngineConfig::default()).expect("valid config");
            engine.on_book_snapshot(&snapshot);
            for tick in &ticks {
                let _ = black_box(engine.on_tick(tick));
            }
            engine.stats().total
        });
    });
    group.finish();
}

fn rsi_benchmark(c: &mut Criterion) {
    let ticks = random_walk(TICKS, 13, Decimal::from(2_500));
    let mut group = c.benchmark_group("rsi");
    group.throughput(Throughput::Elements(TICKS as u64));

    for period in [14usize, 100] {
        group.bench_with_input(BenchmarkId::new("add_price", period), &period, |b, &p| {
            b.iter(|| {
                let mut rsi = RsiCalculator::new(p).expect("valid period");
                for tick in &ticks {
                    let _ = black_box(rsi.add_price(tick.price));
                }
                rsi.current()
            });
        });
    }
    group.finish();
}

fn book_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("book");
    for levels in [5usize, 20, 100] {
        let snapshot = book_snapshot(Decimal::from(43_000), levels, 5);
        group.bench_with_input(BenchmarkId::new("summarize", levels), &snapshot, |b, s| {
            b.iter(|| black_box(summarize(&s.bids, &s.asks, 10, s.observed_at)));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    aggregator_benchmark,
    engine_benchmark,
    rsi_benchmark,
    book_benchmark
);
criterion_main!(benches);
