//! Renko aggregation for the brickline Renko engine.
//!
//! This crate turns a tick stream into Renko blocks:
//!
//! - [`RenkoAggregator`] - The block state machine
//! - [`RenkoEngine`] - Context object combining the aggregator, RSI and order book
//! - [`RenkoStats`] - Block counts over a series

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/brickline/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod engine;
mod renko;
mod stats;

pub use engine::{EngineConfig, RenkoEngine};
pub use renko::{AggregatorState, RenkoAggregator};
pub use stats::RenkoStats;
