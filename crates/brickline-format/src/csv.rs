//! CSV output format.

use std::io::Write;

use crate::{BlockRecord, FormatError, Formatter};

/// CSV formatter.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: char,
    /// Whether to include header row.
    include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Creates a tab-separated values (TSV) formatter.
    #[must_use]
    pub const fn tsv() -> Self {
        Self {
            delimiter: '\t',
            include_header: true,
        }
    }

    pub(crate) fn write_header<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let d = self.delimiter.to_string();
        writeln!(writer, "{}", BlockRecord::COLUMNS.join(&d))
    }

    pub(crate) fn write_row<W: Write>(
        &self,
        record: &BlockRecord,
        writer: &mut W,
    ) -> std::io::Result<()> {
        let d = self.delimiter.to_string();
        writeln!(writer, "{}", record.cells().join(&d))
    }
}

impl Formatter for CsvFormatter {
    fn write_records<W: Write + Send>(
        &self,
        records: &[BlockRecord],
        mut writer: W,
    ) -> Result<(), FormatError> {
        if self.include_header {
            self.write_header(&mut writer)?;
        }
        for record in records {
            self.write_row(record, &mut writer)?;
        }
        Ok(())
    }

    fn extension(&self) -> &str {
        "csv"
    }
}
