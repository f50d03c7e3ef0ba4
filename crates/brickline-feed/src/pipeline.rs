//! Single-writer ingestion loop with a detached sink.

use brickline_aggregate::RenkoEngine;
use brickline_format::{BlockRecord, BlockSink};
use brickline_types::RenkoBlock;
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::{FeedError, FeedEvent};

/// Counters from one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Trades received.
    pub ticks: u64,
    /// Trades the engine rejected.
    pub rejected_ticks: u64,
    /// Depth snapshots received.
    pub snapshots: u64,
    /// Snapshots rejected as one-sided.
    pub stale_snapshots: u64,
    /// Feed items that failed to parse or read.
    pub feed_errors: u64,
    /// Blocks emitted by the engine.
    pub blocks: u64,
    /// Blocks the sink accepted.
    pub written: u64,
    /// Blocks the sink failed to persist.
    pub sink_failures: u64,
}

/// Drives `engine` from `events` until the stream ends.
///
/// Events are applied strictly in stream order. Every emitted block is
/// passed to `on_block` and queued to `sink`, which runs on a blocking
/// thread behind an unbounded channel so a slow or failing sink never holds
/// up ingestion. Sink failures are logged and counted; the engine state is
/// never rolled back.
///
/// # Errors
///
/// Returns [`FeedError::SinkTask`] only if the sink thread panics. Bad feed
/// items and rejected ticks are counted, not returned.
pub async fn run_pipeline<S, K, F>(
    engine: &mut RenkoEngine,
    events: S,
    sink: K,
    mut on_block: F,
) -> Result<RunReport, FeedError>
where
    S: Stream<Item = Result<FeedEvent, FeedError>>,
    K: BlockSink + 'static,
    F: FnMut(&RenkoBlock),
{
    let (tx, rx) = mpsc::unbounded_channel::<BlockRecord>();
    let writer = tokio::task::spawn_blocking(move || drain(sink, rx));

    let mut report = RunReport::default();
    let mut events = std::pin::pin!(events);
    while let Some(event) = events.next().await {
        match event {
            Ok(FeedEvent::Trade(tick)) => {
                report.ticks += 1;
                match engine.on_tick(&tick) {
                    Ok(Some(block)) => {
                        report.blocks += 1;
                        on_block(&block);
                        if tx.send(BlockRecord::from(&block)).is_err() {
                            warn!(index = block.sequence_index, "block sink is gone, block not persisted");
                        }
                    }
                    Ok(None) => {}
                    Err(_) => report.rejected_ticks += 1,
                }
            }
            Ok(FeedEvent::Book(snapshot)) => {
                report.snapshots += 1;
                if !engine.on_book_snapshot(&snapshot).is_updated() {
                    report.stale_snapshots += 1;
                }
            }
            Err(e) => {
                report.feed_errors += 1;
                warn!(error = %e, "skipping feed item");
            }
        }
    }
    drop(tx);

    let (written, failures) = writer
        .await
        .map_err(|e| FeedError::SinkTask(e.to_string()))?;
    report.written = written;
    report.sink_failures = failures;

    info!(
        ticks = report.ticks,
        blocks = report.blocks,
        written = report.written,
        sink_failures = report.sink_failures,
        "pipeline finished"
    );
    Ok(report)
}

fn drain<K: BlockSink>(mut sink: K, mut rx: mpsc::UnboundedReceiver<BlockRecord>) -> (u64, u64) {
    let mut written = 0;
    let mut failures = 0;
    while let Some(record) = rx.blocking_recv() {
        match sink.write(&record) {
            Ok(()) => written += 1,
            Err(e) => {
                failures += 1;
                error!(error = %e, created_at = %record.created_at, "failed to persist block");
            }
        }
    }
    if let Err(e) = sink.flush() {
        error!(error = %e, "failed to flush block sink");
    }
    debug!(written, failures, "block sink drained");
    (written, failures)
}
