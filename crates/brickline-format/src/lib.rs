//! Persistence and output formats for the brickline Renko engine.
//!
//! - [`BlockRecord`] - The stored row for one block, reversal encoded as `-1/0/1`
//! - [`SchemaContract`] - Startup check of a target's columns
//! - [`BlockSink`] - Per-block writers ([`NdjsonSink`], [`CsvSink`], [`MemorySink`])
//! - [`CsvFormatter`] / [`JsonFormatter`] / [`ParquetFormatter`] - Batch exports
//! - [`load_history`] - Reading stored blocks back for seeding

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/brickline/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod formatter;
mod history;
mod json;
mod record;
mod schema;
mod sink;

#[cfg(feature = "parquet")]
mod parquet;

pub use crate::csv::CsvFormatter;
pub use formatter::{FormatError, Formatter, OutputFormat};
pub use history::{DEFAULT_HISTORY_LIMIT, load_history, read_csv_history, read_ndjson_history};
pub use json::{JsonFormatter, JsonStyle};
pub use record::{BlockRecord, RecordError, records_to_blocks};
pub use schema::{SchemaContract, SchemaError};
pub use sink::{BlockSink, CsvSink, MemorySink, NdjsonSink, SinkError, SinkFormat, open_file_sink};

#[cfg(feature = "parquet")]
pub use crate::parquet::ParquetFormatter;
