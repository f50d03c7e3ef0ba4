//! Replaying a recorded feed into a block file and resuming from it.

use brickline_aggregate::{EngineConfig, RenkoEngine};
use brickline_feed::{merge_events, read_events, run_pipeline};
use brickline_format::{DEFAULT_HISTORY_LIMIT, SinkFormat, load_history, open_file_sink, records_to_blocks};
use brickline_types::BlockSize;
use rust_decimal_macros::dec;
use std::fmt::Write;

fn recorded_feed(start: i64, prices: &[&str]) -> String {
    let mut feed = String::new();
    for (i, price) in prices.iter().enumerate() {
        let t = start + i as i64 * 1_000;
        writeln!(feed, r#"{{"e":"trade","p":"{price}","q":"0.5","T":{t}}}"#).unwrap();
        if i % 3 == 0 {
            writeln!(
                feed,
                r#"{{"lastUpdateId":{i},"bids":[["{price}","1.2"]],"asks":[["{price}","0.8"]]}}"#
            )
            .unwrap();
        }
    }
    feed
}

fn engine() -> RenkoEngine {
    RenkoEngine::new(EngineConfig::default().with_block_size(BlockSize::new(dec!(10)).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn replay_then_resume_matches_uninterrupted_run() {
    let first = ["100", "121", "95", "80", "84.2", "102"];
    let second = ["115", "131", "128", "99"];
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blocks.ndjson");

    let mut engine_a = engine();
    let feed = recorded_feed(1_704_067_200_000, &first);
    let sink = open_file_sink(SinkFormat::Ndjson, &path).unwrap();
    let report = run_pipeline(&mut engine_a, read_events(feed.as_bytes()), sink, |_| {})
        .await
        .unwrap();
    assert_eq!(report.ticks, first.len() as u64);
    assert_eq!(report.feed_errors, 0);
    assert_eq!(report.written, report.blocks);

    let records = load_history(&path, SinkFormat::Ndjson, DEFAULT_HISTORY_LIMIT)
        .await
        .unwrap();
    assert_eq!(records.len() as u64, report.blocks);
    let history = records_to_blocks(&records).unwrap();

    let mut engine_b = engine();
    assert!(engine_b.seed(&history));
    assert_eq!(engine_b.aggregator().last_close(), engine_a.aggregator().last_close());
    assert_eq!(engine_b.stats(), engine_a.stats());

    let tail = recorded_feed(1_704_067_300_000, &second);
    let mut continued = Vec::new();
    let mut resumed = Vec::new();
    run_pipeline(&mut engine_a, read_events(tail.as_bytes()), brickline_format::MemorySink::new(), |b| {
        continued.push((b.sequence_index, b.open, b.close, b.reversal));
    })
    .await
    .unwrap();
    run_pipeline(&mut engine_b, read_events(tail.as_bytes()), brickline_format::MemorySink::new(), |b| {
        resumed.push((b.sequence_index, b.open, b.close, b.reversal));
    })
    .await
    .unwrap();

    assert!(!continued.is_empty());
    assert_eq!(continued, resumed);
}

#[tokio::test]
async fn merged_depth_file_annotates_blocks_by_time() {
    let trades = concat!(
        r#"{"e":"trade","p":"100","q":"1","T":1704067200000}"#, "\n",
        r#"{"e":"trade","p":"121","q":"1","T":1704067201000}"#, "\n",
        r#"{"e":"trade","p":"135","q":"1","T":1704067202000}"#, "\n",
    );
    let depth = concat!(
        r#"{"bids":[["119","2"]],"asks":[["120","1"]],"E":1704067201500}"#, "\n",
        r#"{"bids":[["500","2"]],"asks":[["501","1"]],"E":1704070800000}"#, "\n",
    );

    let mut engine = engine();
    let mut books = Vec::new();
    let events = merge_events(read_events(trades.as_bytes()), read_events(depth.as_bytes()));
    let report = run_pipeline(&mut engine, events, brickline_format::MemorySink::new(), |b| {
        books.push(b.order_book.map(|ob| ob.best_bid.price));
    })
    .await
    .unwrap();

    assert_eq!(report.snapshots, 2);
    assert_eq!(books, [None, None, Some(dec!(119))]);
    assert_eq!(engine.order_book().unwrap().best_bid.price, dec!(500));
}
