//! Market data feed handling for the brickline Renko engine.
//!
//! - [`parse_message`] - Trade, partial depth and combined-stream messages
//! - [`read_events`] / [`merge_events`] - Async event streams
//! - [`run_pipeline`] - Single-writer ingestion with a detached block sink

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/brickline/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod parse;
mod pipeline;
mod stream;

pub use error::FeedError;
pub use parse::{FeedEvent, parse_message};
pub use pipeline::{RunReport, run_pipeline};
pub use stream::{merge_events, read_events};
