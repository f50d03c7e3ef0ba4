//! Order book summaries for the brickline Renko engine.
//!
//! - [`summarize`] - Pure reduction of one snapshot to an [`OrderBookSummary`]
//! - [`OrderBookSummarizer`] - Holds the latest summary across snapshots
//!
//! [`OrderBookSummary`]: brickline_types::OrderBookSummary

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/brickline/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod summarizer;
mod summary;

pub use summarizer::{OrderBookSummarizer, SnapshotOutcome};
pub use summary::{DEFAULT_DEPTH, Side, SummaryError, summarize};
