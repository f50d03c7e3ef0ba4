//! Apache Parquet output format.

use arrow::array::{ArrayRef, Decimal128Array, Int8Array, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use rust_decimal::Decimal;
use std::io::Write;
use std::sync::Arc;

use crate::{BlockRecord, FormatError, Formatter};

/// Decimal precision of every price and liquidity column.
const DECIMAL_PRECISION: u8 = 38;

/// Fractional digits kept in every price and liquidity column.
const DECIMAL_SCALE: u32 = 8;

/// Parquet formatter.
#[derive(Debug, Clone)]
pub struct ParquetFormatter {
    /// Row group size (number of rows per group).
    row_group_size: usize,
    /// Compression codec.
    compression: Compression,
}

impl Default for ParquetFormatter {
    fn default() -> Self {
        Self {
            row_group_size: 100_000,
            compression: Compression::SNAPPY,
        }
    }
}

impl ParquetFormatter {
    /// Creates a new Parquet formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the row group size.
    #[must_use]
    pub const fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Sets the compression codec.
    #[must_use]
    pub const fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Creates the Arrow schema for block records.
    fn schema() -> Schema {
        let decimal = DataType::Decimal128(DECIMAL_PRECISION, DECIMAL_SCALE as i8);
        let fields = BlockRecord::COLUMNS.iter().map(|&name| match name {
            "reversal" => Field::new(name, DataType::Int8, false),
            "created_at" => Field::new(
                name,
                DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
                false,
            ),
            "open" | "close" | "high" | "low" | "volume" => {
                Field::new(name, decimal.clone(), false)
            }
            _ => Field::new(name, decimal.clone(), true),
        });
        Schema::new(fields.collect::<Vec<_>>())
    }

    /// Converts records to an Arrow RecordBatch.
    fn records_to_batch(records: &[BlockRecord]) -> Result<RecordBatch, FormatError> {
        let columns: Vec<ArrayRef> = vec![
            required(records, |r| r.open)?,
            required(records, |r| r.close)?,
            required(records, |r| r.high)?,
            required(records, |r| r.low)?,
            required(records, |r| r.volume)?,
            Arc::new(Int8Array::from_iter_values(records.iter().map(|r| r.reversal))),
            optional(records, |r| r.best_bid_price)?,
            optional(records, |r| r.best_bid_quantity)?,
            optional(records, |r| r.best_ask_price)?,
            optional(records, |r| r.best_ask_quantity)?,
            optional(records, |r| r.spread)?,
            optional(records, |r| r.spread_percentage)?,
            optional(records, |r| r.bid_liquidity)?,
            optional(records, |r| r.ask_liquidity)?,
            optional(records, |r| r.total_liquidity)?,
            optional(records, |r| r.imbalance)?,
            optional(records, |r| r.weighted_mid_price)?,
            Arc::new(
                TimestampMicrosecondArray::from_iter_values(
                    records.iter().map(|r| r.created_at.timestamp_micros()),
                )
                .with_timezone("UTC"),
            ),
        ];

        RecordBatch::try_new(Arc::new(Self::schema()), columns)
            .map_err(|e| FormatError::Parquet(e.to_string()))
    }
}

fn required(
    records: &[BlockRecord],
    field: impl Fn(&BlockRecord) -> Decimal,
) -> Result<ArrayRef, FormatError> {
    let values = records
        .iter()
        .map(|r| scaled(field(r)).map(Some))
        .collect::<Result<Vec<_>, _>>()?;
    decimal_array(values)
}

fn optional(
    records: &[BlockRecord],
    field: impl Fn(&BlockRecord) -> Option<Decimal>,
) -> Result<ArrayRef, FormatError> {
    let values = records
        .iter()
        .map(|r| field(r).map(scaled).transpose())
        .collect::<Result<Vec<_>, _>>()?;
    decimal_array(values)
}

/// Returns the unscaled integer of `value` at [`DECIMAL_SCALE`].
fn scaled(value: Decimal) -> Result<i128, FormatError> {
    let mut v = value.round_dp(DECIMAL_SCALE);
    v.rescale(DECIMAL_SCALE);
    if v.scale() == DECIMAL_SCALE {
        Ok(v.mantissa())
    } else {
        Err(FormatError::Parquet(format!(
            "{value} does not fit {DECIMAL_SCALE} decimal places"
        )))
    }
}

fn decimal_array(values: Vec<Option<i128>>) -> Result<ArrayRef, FormatError> {
    let array = Decimal128Array::from(values)
        .with_precision_and_scale(DECIMAL_PRECISION, DECIMAL_SCALE as i8)
        .map_err(|e| FormatError::Parquet(e.to_string()))?;
    Ok(Arc::new(array))
}

impl Formatter for ParquetFormatter {
    fn write_records<W: Write + Send>(
        &self,
        records: &[BlockRecord],
        writer: W,
    ) -> Result<(), FormatError> {
        let schema = Arc::new(Self::schema());
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut arrow_writer = ArrowWriter::try_new(writer, schema, Some(props))
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        for chunk in records.chunks(self.row_group_size.max(1)) {
            let batch = Self::records_to_batch(chunk)?;
            arrow_writer
                .write(&batch)
                .map_err(|e| FormatError::Parquet(e.to_string()))?;
        }

        arrow_writer
            .close()
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        Ok(())
    }

    fn extension(&self) -> &str {
        "parquet"
    }
}
