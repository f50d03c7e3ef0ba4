//! Display utilities and output formatting for the brickline CLI.

use anyhow::Result;
use brickline_lib::prelude::*;
use brickline_lib::RunReport;
use clap::ValueEnum;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Output format for exported blocks.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Json,
    Ndjson,
    Parquet,
}

impl Format {
    /// Returns the file extension for this format.
    pub(crate) const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
            Self::Parquet => "parquet",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Append-only block file format.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum SinkArg {
    Csv,
    Ndjson,
}

impl From<SinkArg> for SinkFormat {
    fn from(arg: SinkArg) -> Self {
        match arg {
            SinkArg::Csv => Self::Csv,
            SinkArg::Ndjson => Self::Ndjson,
        }
    }
}

/// Write block records to a file in the specified format.
pub(crate) fn write_records(records: &[BlockRecord], output: &Path, format: Format) -> Result<()> {
    let file = File::create(output)?;
    let writer = BufWriter::new(file);

    match format {
        Format::Csv => CsvFormatter::new().write_records(records, writer)?,
        Format::Json => JsonFormatter::new().with_pretty(true).write_records(records, writer)?,
        Format::Ndjson => JsonFormatter::ndjson().write_records(records, writer)?,
        Format::Parquet => {
            #[cfg(feature = "parquet")]
            {
                ParquetFormatter::new().write_records(records, writer)?;
            }
            #[cfg(not(feature = "parquet"))]
            {
                drop(writer);
                anyhow::bail!("Parquet support not compiled in");
            }
        }
    }

    Ok(())
}

/// One-line summary of a block for terminal output.
pub(crate) fn block_line(block: &RenkoBlock) -> String {
    let rsi = block
        .rsi
        .map_or_else(|| "-".to_string(), |v| v.round_dp(2).to_string());
    format!(
        "#{:<6} {:<4} {:>12} -> {:<12} vol {:>14} rsi {:>6}{}",
        block.sequence_index,
        block.direction.as_str(),
        block.open,
        block.close,
        block.volume.round_dp(4),
        rsi,
        if block.reversal.is_reversal() { "  reversal" } else { "" },
    )
}

/// Prints the end-of-run report.
pub(crate) fn print_report(report: &RunReport, engine: &RenkoEngine) {
    let stats = engine.stats();
    println!("Ticks:      {} ({} rejected)", report.ticks, report.rejected_ticks);
    println!(
        "Snapshots:  {} ({} one-sided)",
        report.snapshots, report.stale_snapshots
    );
    if report.feed_errors > 0 {
        println!("Bad lines:  {}", report.feed_errors);
    }
    println!(
        "Blocks:     {} ({} written, {} failed)",
        report.blocks, report.written, report.sink_failures
    );
    println!(
        "Series:     {} up, {} down, {} reversals",
        stats.up, stats.down, stats.reversals
    );
    if let Some(close) = engine.aggregator().last_close() {
        println!("Last close: {close}");
    }
    match engine.rsi().current() {
        Some(rsi) => println!(
            "RSI({}):    {} ({})",
            engine.rsi().period(),
            rsi.round_dp(2),
            RsiLevel::classify(rsi)
        ),
        None => println!("RSI({}):    warming up", engine.rsi().period()),
    }
    if let Some(book) = engine.order_book() {
        print_book(book, engine.is_book_stale());
    }
}

fn print_book(book: &OrderBookSummary, stale: bool) {
    println!(
        "Book:       {} @ {} / {} @ {}{}",
        book.best_bid.quantity,
        book.best_bid.price,
        book.best_ask.quantity,
        book.best_ask.price,
        if stale { " (stale)" } else { "" }
    );
    println!(
        "            spread {} ({}%), imbalance {}, wmid {}",
        book.spread,
        book.spread_pct.round_dp(4),
        book.imbalance.round_dp(4),
        book.weighted_mid_price.round_dp(4)
    );
}
