//! Core types for the brickline Renko engine.
//!
//! This crate provides the fundamental data structures used throughout brickline:
//!
//! - [`Tick`] - A single executed trade with price, quantity and timestamp
//! - [`BlockSize`] / [`BlockPreset`] - Renko block height and named presets
//! - [`RenkoBlock`] - A completed, immutable Renko block
//! - [`BookSnapshot`] / [`OrderBookSummary`] - Order book snapshots and their statistics
//! - [`Instrument`] - Trading pair with price precision

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/brickline/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod block;
mod block_size;
mod book;
mod error;
mod instrument;
mod tick;

pub use block::{Direction, RenkoBlock, Reversal};
pub use block_size::{BlockPreset, BlockSize};
pub use book::{BookSnapshot, OrderBookLevel, OrderBookSummary};
pub use error::{BlockSizeError, BricklineError, Result, TickError};
pub use instrument::Instrument;
pub use tick::{Tick, validate_price};
