//! Per-block persistence targets.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{BlockRecord, CsvFormatter};

/// Errors writing a block to its sink.
#[derive(Error, Debug)]
pub enum SinkError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Receives blocks one at a time as they are emitted.
///
/// Failures are reported to the caller and never affect the engine that
/// produced the block.
pub trait BlockSink: Send {
    /// Persists one record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record could not be written.
    fn write(&mut self, record: &BlockRecord) -> Result<(), SinkError>;

    /// Flushes buffered output.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl<S: BlockSink + ?Sized> BlockSink for Box<S> {
    fn write(&mut self, record: &BlockRecord) -> Result<(), SinkError> {
        (**self).write(record)
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        (**self).flush()
    }
}

/// On-disk layout of a block file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkFormat {
    /// Header line followed by comma-separated rows.
    Csv,
    /// One JSON object per line.
    #[default]
    Ndjson,
}

impl SinkFormat {
    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Ndjson => "ndjson",
        }
    }

    /// Guesses the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "ndjson" | "jsonl" => Some(Self::Ndjson),
            _ => None,
        }
    }
}

impl std::fmt::Display for SinkFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for SinkFormat {
    type Err = crate::FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "ndjson" | "jsonl" => Ok(Self::Ndjson),
            _ => Err(crate::FormatError::UnknownFormat(s.to_string())),
        }
    }
}

/// Writes each record as one JSON line.
#[derive(Debug)]
pub struct NdjsonSink<W: Write> {
    writer: W,
}

impl<W: Write> NdjsonSink<W> {
    /// Wraps a writer.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> BlockSink for NdjsonSink<W> {
    fn write(&mut self, record: &BlockRecord) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, record)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes each record as one CSV row, emitting the header before the
/// first row unless told the target already has one.
#[derive(Debug)]
pub struct CsvSink<W: Write> {
    writer: W,
    format: CsvFormatter,
    needs_header: bool,
}

impl<W: Write> CsvSink<W> {
    /// Wraps a writer that does not yet contain a header.
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            format: CsvFormatter::new(),
            needs_header: true,
        }
    }

    /// Wraps a writer appending to existing rows.
    pub const fn appending(writer: W) -> Self {
        Self {
            writer,
            format: CsvFormatter::new(),
            needs_header: false,
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> BlockSink for CsvSink<W> {
    fn write(&mut self, record: &BlockRecord) -> Result<(), SinkError> {
        if self.needs_header {
            self.format.write_header(&mut self.writer)?;
            self.needs_header = false;
        }
        self.format.write_row(record, &mut self.writer)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Opens `path` for appending in the given format.
///
/// Each record is flushed as it is written so a crash loses at most the
/// block in flight.
///
/// # Errors
///
/// Returns an error if the file cannot be opened.
pub fn open_file_sink(format: SinkFormat, path: &Path) -> Result<Box<dyn BlockSink>, SinkError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let empty = file.metadata()?.len() == 0;
    debug!(path = %path.display(), %format, empty, "opened block sink");

    let writer = BufWriter::new(file);
    Ok(match format {
        SinkFormat::Ndjson => Box::new(Flushing(NdjsonSink::new(writer))),
        SinkFormat::Csv if empty => Box::new(Flushing(CsvSink::new(writer))),
        SinkFormat::Csv => Box::new(Flushing(CsvSink::appending(writer))),
    })
}

/// Flushes after every record.
#[derive(Debug)]
struct Flushing<S>(S);

impl<S: BlockSink> BlockSink for Flushing<S> {
    fn write(&mut self, record: &BlockRecord) -> Result<(), SinkError> {
        self.0.write(record)?;
        self.0.flush()
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.0.flush()
    }
}

/// Keeps records in memory. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<BlockRecord>>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything written so far.
    #[must_use]
    pub fn records(&self) -> Vec<BlockRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of records written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlockSink for MemorySink {
    fn write(&mut self, record: &BlockRecord) -> Result<(), SinkError> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }
}
