//! Exchange message parsing.

use brickline_types::{BookSnapshot, OrderBookLevel, Tick};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::FeedError;

/// One normalised feed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// An executed trade.
    Trade(Tick),
    /// A full-replace depth snapshot.
    Book(BookSnapshot),
}

impl FeedEvent {
    /// Returns the event time.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Trade(tick) => tick.timestamp,
            Self::Book(snapshot) => snapshot.observed_at,
        }
    }
}

/// Trade stream payload (`<symbol>@trade`). Prices and quantities arrive as
/// strings.
#[derive(Debug, Deserialize)]
struct TradeMessage {
    #[serde(rename = "p")]
    price: Decimal,
    #[serde(rename = "q")]
    quantity: Decimal,
    #[serde(rename = "T")]
    trade_time: i64,
}

/// Partial depth payload (`<symbol>@depth<N>`). Carries no event time of its
/// own unless it was recorded with one.
#[derive(Debug, Deserialize)]
struct DepthMessage {
    bids: Vec<(Decimal, Decimal)>,
    asks: Vec<(Decimal, Decimal)>,
    #[serde(rename = "E", default)]
    event_time: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawMessage {
    Trade(TradeMessage),
    Depth(DepthMessage),
    Combined { data: Box<RawMessage> },
}

fn millis(ms: i64) -> Result<DateTime<Utc>, FeedError> {
    DateTime::from_timestamp_millis(ms).ok_or(FeedError::Timestamp(ms))
}

fn levels(raw: Vec<(Decimal, Decimal)>) -> Vec<OrderBookLevel> {
    raw.into_iter()
        .map(|(price, quantity)| OrderBookLevel::new(price, quantity))
        .collect()
}

impl RawMessage {
    fn into_event(self, fallback_time: DateTime<Utc>) -> Result<FeedEvent, FeedError> {
        match self {
            Self::Trade(t) => Ok(FeedEvent::Trade(Tick::new(
                t.price,
                t.quantity,
                millis(t.trade_time)?,
            ))),
            Self::Depth(d) => {
                let observed_at = d.event_time.map(millis).transpose()?.unwrap_or(fallback_time);
                Ok(FeedEvent::Book(BookSnapshot::new(
                    levels(d.bids),
                    levels(d.asks),
                    observed_at,
                )))
            }
            Self::Combined { data } => data.into_event(fallback_time),
        }
    }
}

/// Parses a trade, depth, or combined-stream message.
///
/// Depth messages without an `E` field are stamped with `fallback_time`.
/// Tick values are not validated here; the engine rejects bad ticks.
///
/// # Errors
///
/// Returns [`FeedError::Json`] for anything that is not one of the known
/// shapes and [`FeedError::Timestamp`] for an unrepresentable event time.
pub fn parse_message(line: &str, fallback_time: DateTime<Utc>) -> Result<FeedEvent, FeedError> {
    serde_json::from_str::<RawMessage>(line)?.into_event(fallback_time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    const TRADE: &str = r#"{"e":"trade","E":1704067200100,"s":"BTCUSDT","t":12345,"p":"42000.50","q":"0.015","T":1704067200000,"m":true}"#;
    const DEPTH: &str = r#"{"lastUpdateId":160,"bids":[["42000.10","1.5"],["42000.00","2"]],"asks":[["42000.60","0.4"]]}"#;

    fn fallback() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_trade() {
        let FeedEvent::Trade(tick) = parse_message(TRADE, fallback()).unwrap() else {
            panic!("expected trade");
        };
        assert_eq!(tick.price, dec!(42000.50));
        assert_eq!(tick.quantity, dec!(0.015));
        assert_eq!(tick.timestamp, Utc.timestamp_millis_opt(1_704_067_200_000).unwrap());
    }

    #[test]
    fn test_parse_depth() {
        let FeedEvent::Book(book) = parse_message(DEPTH, fallback()).unwrap() else {
            panic!("expected depth");
        };
        assert_eq!(book.bids.len(), 2);
        assert_eq!(book.bids[0], OrderBookLevel::new(dec!(42000.10), dec!(1.5)));
        assert_eq!(book.asks[0].quantity, dec!(0.4));
        assert_eq!(book.observed_at, fallback());
    }

    #[test]
    fn test_parse_depth_with_event_time() {
        let line = r#"{"E":1704067201000,"bids":[["1","1"]],"asks":[]}"#;
        let event = parse_message(line, fallback()).unwrap();
        assert_eq!(event.timestamp(), Utc.timestamp_millis_opt(1_704_067_201_000).unwrap());
    }

    #[test]
    fn test_parse_combined_stream() {
        let line = format!(r#"{{"stream":"btcusdt@trade","data":{TRADE}}}"#);
        assert!(matches!(
            parse_message(&line, fallback()).unwrap(),
            FeedEvent::Trade(_)
        ));
    }

    #[test]
    fn test_unknown_message() {
        let err = parse_message(r#"{"result":null,"id":1}"#, fallback()).unwrap_err();
        assert!(matches!(err, FeedError::Json(_)));
        assert!(parse_message("not json", fallback()).is_err());
    }
}
