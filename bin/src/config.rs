//! TOML configuration file.
//!
//! Looked up at `--config`, then the platform config directory, then
//! built-in defaults. Every section and key is optional.

use anyhow::{Context, Result, bail};
use brickline_lib::prelude::*;
use brickline_lib::{DEFAULT_DEPTH, DEFAULT_HISTORY_LIMIT, DEFAULT_PERIOD, SchemaContract};
use directories::ProjectDirs;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the config file inside the platform config directory.
const CONFIG_FILE: &str = "brickline.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    pub(crate) instrument: InstrumentConfig,
    pub(crate) renko: RenkoConfig,
    pub(crate) rsi: RsiConfig,
    pub(crate) order_book: OrderBookConfig,
    pub(crate) sink: SinkConfig,
    pub(crate) logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct InstrumentConfig {
    pub(crate) symbol: String,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            symbol: "btcusdt".to_string(),
        }
    }
}

/// Either an explicit `block_size` or a named `preset`, not both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RenkoConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) block_size: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) preset: Option<BlockPreset>,
}

impl RenkoConfig {
    pub(crate) fn block_size(&self) -> Result<BlockSize> {
        match (self.block_size, self.preset) {
            (Some(_), Some(_)) => bail!("renko: set either block_size or preset, not both"),
            (Some(size), None) => BlockSize::new(size).context("renko.block_size"),
            (None, Some(preset)) => Ok(preset.block_size()),
            (None, None) => Ok(BlockSize::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RsiConfig {
    pub(crate) period: usize,
}

impl Default for RsiConfig {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct OrderBookConfig {
    pub(crate) depth: usize,
}

impl Default for OrderBookConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SinkConfig {
    pub(crate) format: SinkFormat,
    pub(crate) path: PathBuf,
    /// Columns of the target table. Empty skips the schema check.
    pub(crate) columns: Vec<String>,
    /// Seed the aggregator from existing blocks in `path` on start.
    pub(crate) seed: bool,
    pub(crate) history_limit: usize,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            format: SinkFormat::Ndjson,
            path: PathBuf::from("blocks.ndjson"),
            columns: Vec::new(),
            seed: true,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct LoggingConfig {
    pub(crate) level: String,
    pub(crate) json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Config {
    /// Returns the config file in the platform config directory.
    pub(crate) fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "brickline").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Loads the config and returns it with the file it came from, if any.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub(crate) fn load(path: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = path {
            return Ok((Self::from_file(path)?, Some(path.to_path_buf())));
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Ok((Self::from_file(&path)?, Some(path))),
            _ => Ok((Self::default(), None)),
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Rejects settings the engine cannot run with, including a target
    /// table that cannot hold every block column.
    pub(crate) fn validate(&self) -> Result<()> {
        self.renko.block_size()?;
        if self.rsi.period == 0 {
            bail!("rsi.period must be greater than zero");
        }
        if self.order_book.depth == 0 {
            bail!("order_book.depth must be greater than zero");
        }
        if self.instrument.symbol.trim().is_empty() {
            bail!("instrument.symbol must not be empty");
        }
        if !self.sink.columns.is_empty() {
            SchemaContract::new(&self.sink.columns)
                .verify()
                .context("sink.columns does not match the block record")?;
        }
        Ok(())
    }

    pub(crate) fn engine_config(&self) -> Result<EngineConfig> {
        Ok(EngineConfig::default()
            .with_block_size(self.renko.block_size()?)
            .with_rsi_period(self.rsi.period)
            .with_book_depth(self.order_book.depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const FULL: &str = r#"
[instrument]
symbol = "ethusdt"

[renko]
block_size = "2.5"

[rsi]
period = 9

[order_book]
depth = 5

[sink]
format = "csv"
path = "eth.csv"
columns = ["id", "created_at", "open", "close", "high", "low", "volume", "reversal",
           "best_bid_price", "best_bid_quantity", "best_ask_price", "best_ask_quantity",
           "spread", "spread_percentage", "bid_liquidity", "ask_liquidity",
           "total_liquidity", "imbalance", "weighted_mid_price"]

[logging]
level = "debug"
json = true
"#;

    #[test]
    fn test_parse_full() {
        let config: Config = toml::from_str(FULL).unwrap();
        config.validate().unwrap();
        assert_eq!(config.instrument.symbol, "ethusdt");
        assert_eq!(config.renko.block_size().unwrap().get(), dec!(2.5));
        assert_eq!(config.sink.format, SinkFormat::Csv);
        assert!(config.sink.seed);

        let engine = config.engine_config().unwrap();
        assert_eq!(engine.rsi_period, 9);
        assert_eq!(engine.book_depth, 5);
    }

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        config.validate().unwrap();
        assert_eq!(config.renko.block_size().unwrap().get(), dec!(10));
        assert_eq!(config.rsi.period, 14);
        assert_eq!(config.sink.history_limit, 1000);
    }

    #[test]
    fn test_preset() {
        let config: Config = toml::from_str("[renko]\npreset = \"swing\"").unwrap();
        assert_eq!(config.renko.block_size().unwrap().get(), dec!(25));
    }

    #[test]
    fn test_invalid_settings() {
        for text in [
            "[renko]\nblock_size = 0",
            "[renko]\nblock_size = 5\npreset = \"swing\"",
            "[rsi]\nperiod = 0",
            "[order_book]\ndepth = 0",
            "[sink]\ncolumns = [\"open\", \"close\"]",
        ] {
            let config: Config = toml::from_str(text).unwrap();
            assert!(config.validate().is_err(), "{text}");
        }
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(toml::from_str::<Config>("[rsi]\nperiods = 3").is_err());
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("missing.toml"))).is_err());

        let path = dir.path().join("brickline.toml");
        std::fs::write(&path, "[rsi]\nperiod = 21\n").unwrap();
        let (config, from) = Config::load(Some(&path)).unwrap();
        assert_eq!(config.rsi.period, 21);
        assert_eq!(from, Some(path));
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config: Config = toml::from_str(FULL).unwrap();
        let text = toml::to_string(&config).unwrap();
        assert_eq!(toml::from_str::<Config>(&text).unwrap(), config);
    }
}
