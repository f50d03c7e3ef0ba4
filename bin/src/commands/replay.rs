//! Replay command implementation.
//!
//! Streams a recorded feed (one exchange message per line) through the
//! engine, appending every emitted block to the configured sink. With
//! seeding enabled the run continues the series already in the sink file.

use anyhow::{Context, Result};
use brickline_lib::prelude::*;
use brickline_lib::{
    FeedError, load_history, merge_events, open_file_sink, records_to_blocks,
};
use clap::Args;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::File;
use tokio::io::BufReader;
use tracing::info;

use crate::config::Config;
use crate::display::{SinkArg, block_line, print_report};

/// Arguments for `brickline replay`. Flags override the config file.
#[derive(Args)]
pub(crate) struct ReplayArgs {
    /// Recorded trade messages, one JSON object per line
    trades: PathBuf,

    /// Recorded depth snapshots with event times (`E`), merged with the
    /// trades in time order
    #[arg(long)]
    depth: Option<PathBuf>,

    /// Instrument symbol (e.g., btcusdt)
    #[arg(short, long)]
    symbol: Option<String>,

    /// Block size, as a number or a preset name (scalping, intraday, swing, position)
    #[arg(short, long)]
    block_size: Option<BlockSize>,

    /// RSI lookback period
    #[arg(long)]
    rsi_period: Option<usize>,

    /// Order book levels per side used for liquidity
    #[arg(long)]
    book_depth: Option<usize>,

    /// Block file to append to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Block file format. Inferred from --output when omitted.
    #[arg(long, value_enum)]
    sink_format: Option<SinkArg>,

    /// Start a fresh series instead of continuing the blocks in the output file
    #[arg(long)]
    no_seed: bool,

    /// Print every block as it is emitted
    #[arg(short, long)]
    print_blocks: bool,
}

impl ReplayArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(symbol) = &self.symbol {
            config.instrument.symbol.clone_from(symbol);
        }
        if let Some(size) = self.block_size {
            config.renko.block_size = Some(size.get());
            config.renko.preset = None;
        }
        if let Some(period) = self.rsi_period {
            config.rsi.period = period;
        }
        if let Some(depth) = self.book_depth {
            config.order_book.depth = depth;
        }
        if let Some(path) = &self.output {
            config.sink.path.clone_from(path);
            if let Some(format) = SinkFormat::from_path(path) {
                config.sink.format = format;
            }
        }
        if let Some(format) = self.sink_format {
            config.sink.format = format.into();
        }
        if self.no_seed {
            config.sink.seed = false;
        }
    }
}

/// Runs the replay and prints the run report.
pub(crate) async fn replay(mut config: Config, args: ReplayArgs, quiet: bool) -> Result<()> {
    args.apply(&mut config);
    config.validate()?;

    let instrument = InstrumentRegistry::global()
        .get(&config.instrument.symbol)
        .with_context(|| format!("Unknown instrument: {}", config.instrument.symbol))?
        .clone();

    let mut engine = RenkoEngine::new(config.engine_config()?)?;
    if config.sink.seed {
        seed(&mut engine, &config).await?;
    }
    let sink = open_file_sink(config.sink.format, &config.sink.path)
        .with_context(|| format!("Failed to open {}", config.sink.path.display()))?;

    let trades = read_events(open_feed(&args.trades).await?);
    let events = match &args.depth {
        Some(path) => merge_events(trades, read_events(open_feed(path).await?)).boxed_local(),
        None => trades.boxed_local(),
    };
    let events = events.map(move |event| quantize_trade(&instrument, event));

    info!(
        symbol = %config.instrument.symbol,
        block_size = %engine.aggregator().block_size(),
        sink = %config.sink.path.display(),
        "replay started"
    );

    let pb = progress_bar(quiet);
    let print_blocks = args.print_blocks && !quiet;
    let report = run_pipeline(&mut engine, events, sink, |block| {
        pb.inc(1);
        pb.set_message(format!("last close {}", block.close));
        if print_blocks {
            pb.println(block_line(block));
        }
    })
    .await?;
    pb.finish_and_clear();

    info!(
        ticks = report.ticks,
        blocks = report.blocks,
        written = report.written,
        sink_failures = report.sink_failures,
        "replay finished"
    );
    if !quiet {
        print_report(&report, &engine);
    }
    Ok(())
}

/// Seeds the engine from the tail of the sink file.
async fn seed(engine: &mut RenkoEngine, config: &Config) -> Result<()> {
    let records = load_history(
        &config.sink.path,
        config.sink.format,
        config.sink.history_limit,
    )
    .await
    .with_context(|| format!("Failed to load history from {}", config.sink.path.display()))?;
    let blocks = records_to_blocks(&records)?;
    if engine.seed(&blocks) {
        info!(blocks = blocks.len(), "continuing stored series");
    }
    Ok(())
}

async fn open_feed(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path)
        .await
        .with_context(|| format!("Failed to open feed {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Rounds trade prices to the instrument's quoted precision.
fn quantize_trade(
    instrument: &Instrument,
    event: Result<FeedEvent, FeedError>,
) -> Result<FeedEvent, FeedError> {
    match event {
        Ok(FeedEvent::Trade(mut tick)) => {
            tick.price = instrument.quantize(tick.price);
            Ok(FeedEvent::Trade(tick))
        }
        other => other,
    }
}

fn progress_bar(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} blocks {msg}")
            .expect("Invalid progress template"),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quantize_trade_only_touches_trades() {
        let btc = Instrument::new("btcusdt", "Bitcoin/USDT", 2);
        let tick = Tick::new(dec!(100.005), dec!(1), Utc::now());
        match quantize_trade(&btc, Ok(FeedEvent::Trade(tick))).unwrap() {
            FeedEvent::Trade(t) => assert_eq!(t.price, dec!(100.00)),
            FeedEvent::Book(_) => panic!("expected a trade"),
        }

        let book = BookSnapshot::new(Vec::new(), Vec::new(), Utc::now());
        let out = quantize_trade(&btc, Ok(FeedEvent::Book(book.clone()))).unwrap();
        assert_eq!(out, FeedEvent::Book(book));
    }

    #[tokio::test]
    async fn test_replay_appends_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let trades = dir.path().join("trades.ndjson");
        let output = dir.path().join("blocks.ndjson");
        std::fs::write(
            &trades,
            concat!(
                r#"{"e":"trade","p":"100","q":"1","T":1704067200000}"#, "\n",
                r#"{"e":"trade","p":"121","q":"1","T":1704067201000}"#, "\n",
                r#"{"e":"trade","p":"135","q":"1","T":1704067202000}"#, "\n",
            ),
        )
        .unwrap();

        let args = |path: &Path| ReplayArgs {
            trades: path.to_path_buf(),
            depth: None,
            symbol: None,
            block_size: Some(BlockSize::new(dec!(10)).unwrap()),
            rsi_period: Some(2),
            book_depth: None,
            output: Some(output.clone()),
            sink_format: None,
            no_seed: false,
            print_blocks: false,
        };

        replay(Config::default(), args(&trades), true).await.unwrap();
        let first = load_history(&output, SinkFormat::Ndjson, 100).await.unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(first[2].close, dec!(130));

        // A second run seeds from the file and only appends new blocks.
        let more = dir.path().join("more.ndjson");
        std::fs::write(
            &more,
            concat!(r#"{"e":"trade","p":"142","q":"1","T":1704067203000}"#, "\n"),
        )
        .unwrap();
        replay(Config::default(), args(&more), true).await.unwrap();
        let all = load_history(&output, SinkFormat::Ndjson, 100).await.unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[3].open, dec!(130));
        assert_eq!(all[3].close, dec!(140));
    }
}
