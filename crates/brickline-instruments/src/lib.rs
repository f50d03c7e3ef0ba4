//! Instrument registry for the brickline Renko engine.
//!
//! This crate provides access to the trading pairs brickline can aggregate,
//! with their quoted price precision.
//!
//! # Example
//!
//! ```
//! use brickline_instruments::InstrumentRegistry;
//!
//! let registry = InstrumentRegistry::global();
//!
//! // Lookup by symbol
//! if let Some(instrument) = registry.get("btcusdt") {
//!     println!("{}: {} decimals", instrument.name(), instrument.price_decimals());
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/brickline/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::sync::OnceLock;

use brickline_types::Instrument;

/// The instrument metadata JSON embedded at compile time.
const INSTRUMENTS_JSON: &str = include_str!("../data/instruments.json");

/// Global instrument registry instance.
static REGISTRY: OnceLock<InstrumentRegistry> = OnceLock::new();

/// Registry of all supported trading pairs.
#[derive(Debug)]
pub struct InstrumentRegistry {
    instruments: HashMap<String, Instrument>,
}

impl InstrumentRegistry {
    /// Returns the global instrument registry.
    ///
    /// The registry is initialized lazily on first access.
    #[must_use]
    pub fn global() -> &'static Self {
        REGISTRY.get_or_init(Self::load)
    }

    /// Loads instruments from the embedded JSON data.
    fn load() -> Self {
        let instruments: HashMap<String, Instrument> =
            serde_json::from_str(INSTRUMENTS_JSON).expect("Invalid instruments.json");
        Self { instruments }
    }

    /// Looks up an instrument by symbol (case-insensitive).
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&Instrument> {
        self.instruments.get(&symbol.to_lowercase())
    }

    /// Returns all instruments as an iterator.
    pub fn all(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.values()
    }

    /// Returns the total number of instruments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// Returns true if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Searches instruments by symbol or name pattern (case-insensitive).
    pub fn search(&self, pattern: &str) -> Vec<&Instrument> {
        let pattern = pattern.to_lowercase();
        self.instruments
            .values()
            .filter(|i| {
                i.symbol().to_lowercase().contains(&pattern)
                    || i.name().to_lowercase().contains(&pattern)
            })
            .collect()
    }

    /// Returns all symbols sorted alphabetically.
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.instruments.keys().map(String::as_str).collect();
        symbols.sort_unstable();
        symbols
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_registry_loads() {
        let registry = InstrumentRegistry::global();
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_get_btcusdt() {
        let registry = InstrumentRegistry::global();
        let btc = registry.get("btcusdt").expect("BTCUSDT should exist");
        assert_eq!(btc.symbol(), "btcusdt");
        assert_eq!(btc.price_decimals(), 2);
        assert_eq!(btc.quantize(dec!(43250.456)), dec!(43250.46));
    }

    #[test]
    fn test_get_case_insensitive() {
        let registry = InstrumentRegistry::global();
        assert!(registry.get("BTCUSDT").is_some());
        assert!(registry.get("BtcUsdt").is_some());
    }

    #[test]
    fn test_search() {
        let registry = InstrumentRegistry::global();
        let results = registry.search("cardano");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].price_decimals(), 4);
    }

    #[test]
    fn test_symbols_sorted() {
        let symbols = InstrumentRegistry::global().symbols();
        assert_eq!(symbols.first(), Some(&"adausdt"));
    }
}
