//! Renko block size and its named presets.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::BlockSizeError;

/// Price height of one Renko block. Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct BlockSize(Decimal);

impl BlockSize {
    /// Creates a block size.
    ///
    /// # Errors
    ///
    /// Returns [`BlockSizeError::NonPositive`] unless `value > 0`, and
    /// [`BlockSizeError::TooLarge`] when the reversal threshold (twice the
    /// size) is not representable.
    pub fn new(value: Decimal) -> Result<Self, BlockSizeError> {
        if value <= Decimal::ZERO {
            return Err(BlockSizeError::NonPositive(value));
        }
        if value.checked_add(value).is_none() {
            return Err(BlockSizeError::TooLarge(value));
        }
        Ok(Self(value.normalize()))
    }

    /// Returns the block height.
    #[must_use]
    pub const fn get(self) -> Decimal {
        self.0
    }

    /// Returns twice the block height, the move needed for a reversal.
    #[must_use]
    pub fn reversal_threshold(self) -> Decimal {
        // `new` guarantees the double fits.
        self.0.saturating_add(self.0)
    }
}

impl Default for BlockSize {
    fn default() -> Self {
        BlockPreset::default().block_size()
    }
}

impl TryFrom<Decimal> for BlockSize {
    type Error = BlockSizeError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BlockSize> for Decimal {
    fn from(size: BlockSize) -> Self {
        size.0
    }
}

impl std::fmt::Display for BlockSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BlockSize {
    type Err = BlockSizeError;

    /// Parses either a decimal number (`"12.5"`) or a preset name
    /// (`"swing"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(preset) = s.parse::<BlockPreset>() {
            return Ok(preset.block_size());
        }
        let value =
            Decimal::from_str(s.trim()).map_err(|_| BlockSizeError::Unparseable(s.to_string()))?;
        Self::new(value)
    }
}

/// Named block sizes for common trading horizons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BlockPreset {
    /// $5 blocks.
    Scalping,
    /// $10 blocks.
    #[default]
    Intraday,
    /// $25 blocks.
    Swing,
    /// $50 blocks.
    Position,
}

impl BlockPreset {
    /// Returns the block size of this preset.
    #[must_use]
    pub fn block_size(&self) -> BlockSize {
        let units = match self {
            Self::Scalping => 5,
            Self::Intraday => 10,
            Self::Swing => 25,
            Self::Position => 50,
        };
        BlockSize(Decimal::from(units))
    }

    /// Returns the preset as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scalping => "scalping",
            Self::Intraday => "intraday",
            Self::Swing => "swing",
            Self::Position => "position",
        }
    }

    /// Returns all presets from smallest to largest block.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Scalping, Self::Intraday, Self::Swing, Self::Position]
    }
}

impl std::fmt::Display for BlockPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BlockPreset {
    type Err = BlockSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scalping" => Ok(Self::Scalping),
            "intraday" => Ok(Self::Intraday),
            "swing" => Ok(Self::Swing),
            "position" => Ok(Self::Position),
            _ => Err(BlockSizeError::Unparseable(s.to_string())),
        }
    }
}
