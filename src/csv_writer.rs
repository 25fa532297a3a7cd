//! CSV writing with streaming support

use crate::csv::{CsvEncoder, Dialect};
use crate::error::Result;
use crate::types::AsField;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Line terminator appended after each record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// CSV writer with streaming capabilities
///
/// Writes records row by row, straight to the destination. Memory usage is
/// one reusable line buffer regardless of dataset size.
///
/// # Examples
///
/// ```no_run
/// use csvstream::csv_writer::CsvWriter;
///
/// let mut writer = CsvWriter::create("output.csv").unwrap();
/// writer.write_row(&["Name", "Age", "City"]).unwrap();
/// writer.write_row(&["Alice", "30", "NYC"]).unwrap();
/// writer.save().unwrap();
/// ```
///
/// # Writing to memory
///
/// ```
/// use csvstream::csv_writer::{CsvWriter, LineEnding};
///
/// let mut writer = CsvWriter::new(Vec::new()).line_ending(LineEnding::CrLf);
/// writer.write_row(&[Some("a"), None, Some("b,c")]).unwrap();
/// let bytes = writer.into_inner().unwrap();
/// assert_eq!(bytes, b"a,,\"b,c\"\r\n");
/// ```
pub struct CsvWriter<W: Write> {
    writer: W,

    // State
    row_count: u64,
    buffer: String,

    // Configuration
    encoder: CsvEncoder,
    quote_all: bool,
    line_ending: LineEnding,
}

impl CsvWriter<BufWriter<File>> {
    /// Create a CSV file, truncating an existing one
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path.as_ref())?;
        Ok(CsvWriter::new(BufWriter::new(file)))
    }
}

impl<W: Write> CsvWriter<W> {
    /// Create a writer with the default dialect
    pub fn new(writer: W) -> Self {
        CsvWriter {
            writer,
            row_count: 0,
            buffer: String::with_capacity(4096),
            encoder: CsvEncoder::new(Dialect::default()),
            quote_all: false,
            line_ending: LineEnding::Lf,
        }
    }

    /// Set the dialect (builder pattern)
    ///
    /// # Examples
    ///
    /// ```
    /// use csvstream::csv::Dialect;
    /// use csvstream::csv_writer::CsvWriter;
    ///
    /// let dialect = Dialect::builder().separator(';').build().unwrap();
    /// let writer = CsvWriter::new(Vec::new()).dialect(dialect);
    /// ```
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.encoder = CsvEncoder::new(dialect);
        self
    }

    /// Wrap every field in quotes (builder pattern)
    pub fn quote_all(mut self, quote_all: bool) -> Self {
        self.quote_all = quote_all;
        self
    }

    /// Set the record terminator (builder pattern)
    pub fn line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Write one record
    ///
    /// Accepts string slices, owned strings and `Option` fields alike; a
    /// `None` field is written according to the dialect's null-field indicator.
    pub fn write_row<F: AsField>(&mut self, fields: &[F]) -> Result<()> {
        // Reuse buffer
        self.buffer.clear();
        self.encoder
            .encode_row(fields, self.quote_all, &mut self.buffer);
        self.buffer.push_str(self.line_ending.as_str());

        self.writer.write_all(self.buffer.as_bytes())?;
        self.row_count += 1;
        Ok(())
    }

    /// Write multiple records at once
    ///
    /// # Examples
    ///
    /// ```
    /// use csvstream::csv_writer::CsvWriter;
    ///
    /// let mut writer = CsvWriter::new(Vec::new());
    /// let rows = vec![vec!["Alice", "30"], vec!["Bob", "25"]];
    /// writer.write_rows_batch(&rows).unwrap();
    /// assert_eq!(writer.row_count(), 2);
    /// ```
    pub fn write_rows_batch<I, R, F>(&mut self, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[F]>,
        F: AsField,
    {
        for row in rows {
            self.write_row(row.as_ref())?;
        }
        Ok(())
    }

    /// Get the number of rows written
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and hand back the destination
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }

    /// Flush and close the destination
    ///
    /// Consumes the writer.
    pub fn save(self) -> Result<()> {
        self.into_inner()?;
        Ok(())
    }
}
