//! Renko blocks, RSI and order book summaries from a live trade stream.
//!
//! This is a facade crate that re-exports functionality from the brickline
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use brickline_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut engine = RenkoEngine::new(EngineConfig::default())?;
//!     let file = tokio::io::BufReader::new(tokio::fs::File::open("feed.ndjson").await?);
//!
//!     let report = run_pipeline(&mut engine, read_events(file), MemorySink::new(), |block| {
//!         println!("{} {} -> {}", block.direction, block.open, block.close);
//!     })
//!     .await?;
//!     println!("{} blocks from {} ticks", report.blocks, report.ticks);
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/brickline/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use brickline_types::*;

// Re-export instrument registry
pub use brickline_instruments::InstrumentRegistry;

// Re-export indicators and order book summaries
pub use brickline_book::{
    DEFAULT_DEPTH, OrderBookSummarizer, Side, SnapshotOutcome, SummaryError, summarize,
};
pub use brickline_indicator::{DEFAULT_PERIOD, RsiCalculator, RsiError, RsiLevel};

// Re-export aggregation
#[cfg(feature = "aggregate")]
pub use brickline_aggregate::{
    AggregatorState, EngineConfig, RenkoAggregator, RenkoEngine, RenkoStats,
};

// Re-export persistence and formatters
#[cfg(feature = "format")]
pub use brickline_format::{
    BlockRecord, BlockSink, CsvFormatter, CsvSink, DEFAULT_HISTORY_LIMIT, FormatError, Formatter,
    JsonFormatter, JsonStyle, MemorySink, NdjsonSink, OutputFormat, RecordError, SchemaContract,
    SchemaError, SinkError, SinkFormat, load_history, open_file_sink, read_csv_history,
    read_ndjson_history, records_to_blocks,
};

#[cfg(all(feature = "format", feature = "parquet"))]
pub use brickline_format::ParquetFormatter;

// Re-export feed handling
#[cfg(feature = "feed")]
pub use brickline_feed::{
    FeedError, FeedEvent, RunReport, merge_events, parse_message, read_events, run_pipeline,
};

/// Prelude module for convenient imports.
///
/// ```
/// use brickline_lib::prelude::*;
/// ```
pub mod prelude {
    pub use brickline_types::{
        BlockPreset, BlockSize, BookSnapshot, BricklineError, Direction, Instrument,
        OrderBookLevel, OrderBookSummary, RenkoBlock, Result, Reversal, Tick, TickError,
    };

    pub use brickline_instruments::InstrumentRegistry;

    pub use brickline_book::{OrderBookSummarizer, SnapshotOutcome};
    pub use brickline_indicator::{RsiCalculator, RsiLevel};

    #[cfg(feature = "aggregate")]
    pub use brickline_aggregate::{EngineConfig, RenkoAggregator, RenkoEngine, RenkoStats};

    #[cfg(feature = "format")]
    pub use brickline_format::{
        BlockRecord, BlockSink, CsvFormatter, Formatter, JsonFormatter, MemorySink,
        OutputFormat, SinkFormat,
    };

    #[cfg(all(feature = "format", feature = "parquet"))]
    pub use brickline_format::ParquetFormatter;

    #[cfg(feature = "feed")]
    pub use brickline_feed::{FeedEvent, read_events, run_pipeline};
}
