//! Loading persisted blocks back for seeding.

use std::collections::{HashMap, VecDeque};
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use csv_async::{AsyncReaderBuilder, StringRecord, Trim};
use futures::StreamExt;
use rust_decimal::Decimal;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, BufReader};
use tracing::info;

use crate::{BlockRecord, FormatError, SinkFormat};

/// Number of most recent records loaded by default.
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// Reads NDJSON records, keeping the last `limit` in ascending `created_at`
/// order. Blank lines are skipped.
///
/// # Errors
///
/// Returns [`FormatError::Line`] for the first line that is not a record.
pub async fn read_ndjson_history<R: AsyncBufRead + Unpin>(
    reader: R,
    limit: usize,
) -> Result<Vec<BlockRecord>, FormatError> {
    let mut kept = VecDeque::with_capacity(limit.min(DEFAULT_HISTORY_LIMIT));
    let mut lines = reader.lines();
    let mut number = 0;
    while let Some(line) = lines.next_line().await? {
        number += 1;
        if line.trim().is_empty() {
            continue;
        }
        let record: BlockRecord =
            serde_json::from_str(&line).map_err(|e| FormatError::Line {
                line: number,
                message: e.to_string(),
            })?;
        push_bounded(&mut kept, record, limit);
    }
    Ok(finish(kept))
}

/// Reads CSV records written by [`CsvFormatter`](crate::CsvFormatter),
/// keeping the last `limit` in ascending `created_at` order.
///
/// Columns are matched by header name, so their order does not matter.
/// Quoted cells are accepted.
///
/// # Errors
///
/// Returns [`FormatError::Line`] for a missing header column or a cell that
/// does not parse, and [`FormatError::Csv`] for a malformed row.
pub async fn read_csv_history<R: AsyncRead + Unpin + Send>(
    reader: R,
    limit: usize,
) -> Result<Vec<BlockRecord>, FormatError> {
    let mut reader = AsyncReaderBuilder::new()
        .trim(Trim::All)
        .create_reader(reader);
    let header = reader.headers().await?.clone();
    if header.is_empty() {
        return Ok(Vec::new());
    }
    let positions: HashMap<&str, usize> =
        header.iter().enumerate().map(|(i, name)| (name, i)).collect();
    let mut index = [0usize; BlockRecord::COLUMNS.len()];
    for (slot, column) in index.iter_mut().zip(BlockRecord::COLUMNS) {
        *slot = *positions.get(column).ok_or_else(|| FormatError::Line {
            line: 1,
            message: format!("missing column '{column}'"),
        })?;
    }

    let mut kept = VecDeque::with_capacity(limit.min(DEFAULT_HISTORY_LIMIT));
    let mut records = reader.records();
    while let Some(record) = records.next().await {
        let record = record?;
        let row = Row {
            line: record
                .position()
                .and_then(|p| usize::try_from(p.line()).ok())
                .unwrap_or_default(),
            record: &record,
            index: &index,
        };
        push_bounded(&mut kept, row.parse()?, limit);
    }
    Ok(finish(kept))
}

/// Loads history from a block file. A missing file yields no records.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub async fn load_history(
    path: &Path,
    format: SinkFormat,
    limit: usize,
) -> Result<Vec<BlockRecord>, FormatError> {
    let file = match File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let records = match format {
        SinkFormat::Ndjson => read_ndjson_history(BufReader::new(file), limit).await?,
        SinkFormat::Csv => read_csv_history(file, limit).await?,
    };
    info!(path = %path.display(), records = records.len(), "loaded block history");
    Ok(records)
}

fn push_bounded(kept: &mut VecDeque<BlockRecord>, record: BlockRecord, limit: usize) {
    if limit == 0 {
        return;
    }
    if kept.len() == limit {
        kept.pop_front();
    }
    kept.push_back(record);
}

fn finish(kept: VecDeque<BlockRecord>) -> Vec<BlockRecord> {
    let mut records: Vec<_> = kept.into();
    records.sort_by_key(|r| r.created_at);
    records
}

/// One CSV data row with the column positions resolved from the header.
struct Row<'a> {
    record: &'a StringRecord,
    index: &'a [usize; BlockRecord::COLUMNS.len()],
    line: usize,
}

impl Row<'_> {
    fn cell(&self, column: usize) -> Result<&str, FormatError> {
        self.record
            .get(self.index[column])
            .ok_or_else(|| FormatError::Line {
                line: self.line,
                message: format!("missing {}", BlockRecord::COLUMNS[column]),
            })
    }

    fn error(&self, column: usize, value: &str) -> FormatError {
        FormatError::Line {
            line: self.line,
            message: format!("bad {} '{value}'", BlockRecord::COLUMNS[column]),
        }
    }

    fn parse_cell<T: FromStr>(&self, column: usize) -> Result<T, FormatError> {
        let value = self.cell(column)?;
        value.parse().map_err(|_| self.error(column, value))
    }

    fn optional(&self, column: usize) -> Result<Option<Decimal>, FormatError> {
        if self.cell(column)?.is_empty() {
            Ok(None)
        } else {
            self.parse_cell(column).map(Some)
        }
    }

    fn parse(&self) -> Result<BlockRecord, FormatError> {
        let created = self.cell(17)?;
        let created_at = DateTime::parse_from_rfc3339(created)
            .map_err(|_| self.error(17, created))?
            .with_timezone(&Utc);
        Ok(BlockRecord {
            open: self.parse_cell(0)?,
            close: self.parse_cell(1)?,
            high: self.parse_cell(2)?,
            low: self.parse_cell(3)?,
            volume: self.parse_cell(4)?,
            reversal: self.parse_cell(5)?,
            best_bid_price: self.optional(6)?,
            best_bid_quantity: self.optional(7)?,
            best_ask_price: self.optional(8)?,
            best_ask_quantity: self.optional(9)?,
            spread: self.optional(10)?,
            spread_percentage: self.optional(11)?,
            bid_liquidity: self.optional(12)?,
            ask_liquidity: self.optional(13)?,
            total_liquidity: self.optional(14)?,
            imbalance: self.optional(15)?,
            weighted_mid_price: self.optional(16)?,
            created_at,
        })
    }
}
