//! Incremental indicators for the brickline Renko engine.
//!
//! - [`RsiCalculator`] - Wilder-smoothed Relative Strength Index over raw ticks
//! - [`RsiLevel`] - Overbought / neutral / oversold classification

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/brickline/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod rsi;

pub use rsi::{DEFAULT_PERIOD, RsiCalculator, RsiError, RsiLevel};
