//! Async event streams over recorded or live feed lines.

use chrono::{DateTime, Utc};
use futures::stream::{self, Stream, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::{FeedError, FeedEvent, parse_message};

struct LineState<R> {
    lines: Lines<R>,
    line: usize,
    last_time: DateTime<Utc>,
    done: bool,
}

/// Streams feed events from newline-delimited messages.
///
/// Blank lines are skipped. A line that fails to parse yields an error item
/// tagged with its line number and the stream carries on; an I/O error ends
/// the stream after being yielded. Depth messages without their own event
/// time take the time of the previous event.
pub fn read_events<R>(reader: R) -> impl Stream<Item = Result<FeedEvent, FeedError>>
where
    R: AsyncBufRead + Unpin,
{
    let state = LineState {
        lines: reader.lines(),
        line: 0,
        last_time: Utc::now(),
        done: false,
    };
    stream::unfold(state, |mut st| async move {
        if st.done {
            return None;
        }
        loop {
            match st.lines.next_line().await {
                Ok(Some(text)) => {
                    st.line += 1;
                    if text.trim().is_empty() {
                        continue;
                    }
                    let item = parse_message(&text, st.last_time).map_err(|e| FeedError::Line {
                        line: st.line,
                        source: Box::new(e),
                    });
                    if let Ok(event) = &item {
                        st.last_time = event.timestamp();
                    }
                    return Some((item, st));
                }
                Ok(None) => return None,
                Err(e) => {
                    st.done = true;
                    return Some((Err(e.into()), st));
                }
            }
        }
    })
}

/// Merges two recorded event sources into the single ordered queue the
/// engine requires, earliest event time first.
///
/// Both sources must already be in time order. On equal times the trade
/// goes first. Error items carry no time and are passed on as soon as they
/// reach the head of their source. Each step waits for both sources, so
/// this is meant for recorded files, not live sockets.
pub fn merge_events<A, B>(trades: A, books: B) -> impl Stream<Item = Result<FeedEvent, FeedError>>
where
    A: Stream<Item = Result<FeedEvent, FeedError>>,
    B: Stream<Item = Result<FeedEvent, FeedError>>,
{
    let sources = (Box::pin(trades.peekable()), Box::pin(books.peekable()));
    stream::unfold(sources, |(mut trades, mut books)| async move {
        let take_trade = match (trades.as_mut().peek().await, books.as_mut().peek().await) {
            (None, None) => return None,
            (Some(_), None) | (Some(Err(_)), _) => true,
            (None, Some(_)) | (_, Some(Err(_))) => false,
            (Some(Ok(trade)), Some(Ok(book))) => trade.timestamp() <= book.timestamp(),
        };
        let item = if take_trade {
            trades.next().await
        } else {
            books.next().await
        };
        item.map(|item| (item, (trades, books)))
    })
}
