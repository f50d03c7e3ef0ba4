//! Incremental Relative Strength Index over a tick price stream.

use brickline_types::{TickError, validate_price};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;
use tracing::trace;

/// Default RSI look-back.
pub const DEFAULT_PERIOD: usize = 14;

/// Raw gain/loss samples retained beyond `period`.
const SAMPLE_MARGIN: usize = 10;

/// Number of computed RSI values retained.
const HISTORY_LEN: usize = 100;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
const OVERBOUGHT: Decimal = Decimal::from_parts(70, 0, 0, false, 0);
const OVERSOLD: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

/// Errors constructing an [`RsiCalculator`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RsiError {
    /// The look-back period was zero.
    #[error("RSI period must be greater than zero")]
    ZeroPeriod,
}

/// Momentum classification of an RSI reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiLevel {
    /// RSI at or above 70.
    Overbought,
    /// RSI strictly between 30 and 70.
    Neutral,
    /// RSI at or below 30.
    Oversold,
}

impl RsiLevel {
    /// Classifies an RSI value.
    #[must_use]
    pub fn classify(rsi: Decimal) -> Self {
        if rsi >= OVERBOUGHT {
            Self::Overbought
        } else if rsi <= OVERSOLD {
            Self::Oversold
        } else {
            Self::Neutral
        }
    }

    /// Returns the level as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Overbought => "overbought",
            Self::Neutral => "neutral",
            Self::Oversold => "oversold",
        }
    }
}

impl std::fmt::Display for RsiLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Wilder-smoothed average gain and loss.
#[derive(Debug, Clone, Copy)]
struct Averages {
    gain: Decimal,
    loss: Decimal,
}

/// Incremental RSI calculator.
///
/// The first value is seeded with the arithmetic mean of the first `period`
/// gains and losses; every later value uses Wilder's smoothing
/// `avg = (avg * (period - 1) + sample) / period`. The period is fixed for
/// the lifetime of the calculator; build a new one to change it.
#[derive(Debug, Clone)]
pub struct RsiCalculator {
    period: usize,
    last_price: Option<Decimal>,
    gains: VecDeque<Decimal>,
    losses: VecDeque<Decimal>,
    averages: Option<Averages>,
    history: VecDeque<Decimal>,
}

impl Default for RsiCalculator {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            last_price: None,
            gains: VecDeque::with_capacity(DEFAULT_PERIOD + SAMPLE_MARGIN + 1),
            losses: VecDeque::with_capacity(DEFAULT_PERIOD + SAMPLE_MARGIN + 1),
            averages: None,
            history: VecDeque::with_capacity(HISTORY_LEN + 1),
        }
    }
}

impl RsiCalculator {
    /// Creates a calculator with the given look-back period.
    ///
    /// # Errors
    ///
    /// Returns [`RsiError::ZeroPeriod`] when `period == 0`.
    pub fn new(period: usize) -> Result<Self, RsiError> {
        if period == 0 {
            return Err(RsiError::ZeroPeriod);
        }
        Ok(Self {
            period,
            gains: VecDeque::with_capacity(period + SAMPLE_MARGIN + 1),
            losses: VecDeque::with_capacity(period + SAMPLE_MARGIN + 1),
            ..Self::default()
        })
    }

    /// Returns the look-back period.
    #[must_use]
    pub const fn period(&self) -> usize {
        self.period
    }

    /// Feeds the next price and returns the current RSI.
    ///
    /// Returns `Ok(None)` until `period` price deltas have been seen. The
    /// very first price only establishes the baseline for the next delta.
    ///
    /// # Errors
    ///
    /// Rejects prices `<= 0` without touching any state.
    pub fn add_price(&mut self, price: Decimal) -> Result<Option<Decimal>, TickError> {
        validate_price(price)?;

        if let Some(previous) = self.last_price {
            let delta = price - previous;
            let gain = delta.max(Decimal::ZERO);
            let loss = (-delta).max(Decimal::ZERO);
            self.gains.push_back(gain);
            self.losses.push_back(loss);

            if let Some(rsi) = self.update_averages(gain, loss) {
                self.history.push_back(rsi);
                if self.history.len() > HISTORY_LEN {
                    self.history.pop_front();
                }
                trace!(%price, %rsi, "rsi updated");
            }

            while self.gains.len() > self.period + SAMPLE_MARGIN {
                self.gains.pop_front();
                self.losses.pop_front();
            }
        }
        self.last_price = Some(price);

        Ok(self.current())
    }

    /// Seeds or smooths the averages with the newest sample and returns the
    /// resulting RSI, or `None` while warming up.
    fn update_averages(&mut self, gain: Decimal, loss: Decimal) -> Option<Decimal> {
        let period = Decimal::from(self.period);
        let averages = match self.averages {
            Some(prev) => {
                let weight = period - Decimal::ONE;
                Averages {
                    gain: wilder(prev.gain, gain, weight, period),
                    loss: wilder(prev.loss, loss, weight, period),
                }
            }
            None if self.gains.len() >= self.period => {
                let start = self.gains.len() - self.period;
                Averages {
                    gain: seed_mean(&self.gains, start, period),
                    loss: seed_mean(&self.losses, start, period),
                }
            }
            None => return None,
        };
        self.averages = Some(averages);
        Some(rsi_from(averages))
    }

    /// Returns the most recent RSI, or `None` while warming up.
    #[must_use]
    pub fn current(&self) -> Option<Decimal> {
        self.history.back().copied()
    }

    /// Returns the classification of the current RSI, `None` while warming up.
    #[must_use]
    pub fn level(&self) -> Option<RsiLevel> {
        self.current().map(RsiLevel::classify)
    }

    /// Returns true once at least one RSI value has been produced.
    #[must_use]
    pub fn is_warmed_up(&self) -> bool {
        self.averages.is_some()
    }

    /// Returns the smoothed average gain, once seeded.
    #[must_use]
    pub fn avg_gain(&self) -> Option<Decimal> {
        self.averages.map(|a| a.gain)
    }

    /// Returns the smoothed average loss, once seeded.
    #[must_use]
    pub fn avg_loss(&self) -> Option<Decimal> {
        self.averages.map(|a| a.loss)
    }

    /// Returns up to the last 100 RSI values, oldest first.
    pub fn history(&self) -> impl ExactSizeIterator<Item = Decimal> + '_ {
        self.history.iter().copied()
    }

    /// Clears all samples, averages and history. The period is kept.
    pub fn reset(&mut self) {
        self.last_price = None;
        self.gains.clear();
        self.losses.clear();
        self.averages = None;
        self.history.clear();
    }
}

/// Simple mean of the samples from `start` on. When the plain sum
/// overflows, each sample is scaled down before summing instead.
fn seed_mean(samples: &VecDeque<Decimal>, start: usize, period: Decimal) -> Decimal {
    let window = || samples.iter().skip(start).copied();
    match window().try_fold(Decimal::ZERO, |acc, s| acc.checked_add(s)) {
        Some(sum) => sum / period,
        None => window().fold(Decimal::ZERO, |acc, s| acc.saturating_add(s / period)),
    }
}

/// One step of Wilder's smoothing.
fn wilder(prev: Decimal, sample: Decimal, weight: Decimal, period: Decimal) -> Decimal {
    prev.checked_mul(weight)
        .and_then(|v| v.checked_add(sample))
        .and_then(|v| v.checked_div(period))
        .unwrap_or(prev)
}

/// `100 - 100 / (1 + RS)`, with RSI fixed at 100 when there are no losses.
///
/// A zero average loss gives exactly 100. Some charting code instead pins
/// `RS = 100` there, which reads about 99.01; this does not.
fn rsi_from(averages: Averages) -> Decimal {
    if averages.loss.is_zero() {
        return HUNDRED;
    }
    let Some(rs) = averages.gain.checked_div(averages.loss) else {
        return HUNDRED;
    };
    let rsi = match rs.checked_add(Decimal::ONE).and_then(|d| HUNDRED.checked_div(d)) {
        Some(q) => HUNDRED - q,
        None => HUNDRED,
    };
    rsi.clamp(Decimal::ZERO, HUNDRED)
}
