//! Record reading with support for quoted fields spanning several lines

use crate::csv::{CsvParser, Dialect, LineSource};
use crate::error::{CsvError, Result};
use crate::messages::{number, Locale, MessageKey};
use crate::types::{NullFieldIndicator, Record};
use log::{debug, trace};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::iter::FusedIterator;
use std::path::Path;

/// Longest buffered text quoted in a diagnostic
const MAX_CONTEXT_CHARS: usize = 100;

/// CSV record reader with streaming capabilities
///
/// Reads one logical record at a time. A quoted field containing line
/// breaks is reassembled from as many physical lines as it needs, up to
/// the configured multiline limit. Memory usage is bounded by the largest
/// record.
///
/// # Examples
///
/// ```
/// use csvstream::csv_reader::CsvReader;
/// use std::io::Cursor;
///
/// let data = "name,notes\nAlice,\"first\nsecond\"\n";
/// let mut reader = CsvReader::new(Cursor::new(data)).unwrap();
///
/// let header = reader.next_record().unwrap().unwrap();
/// assert_eq!(header, vec![Some("name".to_string()), Some("notes".to_string())]);
///
/// let row = reader.next_record().unwrap().unwrap();
/// assert_eq!(row[1].as_deref(), Some("first\nsecond"));
/// assert_eq!(reader.lines_read(), 3);
/// assert_eq!(reader.records_read(), 2);
/// ```
///
/// # Skipping lines and limiting record size
///
/// ```
/// use csvstream::csv_reader::CsvReader;
/// use std::io::Cursor;
///
/// let mut reader = CsvReader::builder(Cursor::new("# generated\na,b\n"))
///     .skip_lines(1)
///     .multiline_limit(10)
///     .build()
///     .unwrap();
///
/// for record in reader.records() {
///     println!("{:?}", record.unwrap());
/// }
/// ```
#[derive(Debug)]
pub struct CsvReader<R> {
    // Released on close
    source: Option<LineSource<R>>,
    parser: CsvParser,

    // Counters
    lines_read: u64,
    records_read: u64,
    skip_remaining: usize,

    // Configuration
    multiline_limit: usize,

    // `Some(None)` is a peeked end of input
    peeked: Option<Option<Record>>,
    exhausted: bool,
}

impl CsvReader<BufReader<File>> {
    /// Open a CSV file with the default dialect
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use csvstream::csv_reader::CsvReader;
    ///
    /// let mut reader = CsvReader::open("data.csv").unwrap();
    /// while let Some(record) = reader.next_record().unwrap() {
    ///     println!("{:?}", record);
    /// }
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        CsvReader::new(BufReader::new(file))
    }
}

impl<R: BufRead> CsvReader<R> {
    /// Create a reader with the default dialect and no limits
    pub fn new(source: R) -> Result<Self> {
        CsvReaderBuilder::new(source).build()
    }

    /// Start configuring a reader over `source`
    pub fn builder(source: R) -> CsvReaderBuilder<R> {
        CsvReaderBuilder::new(source)
    }

    pub fn dialect(&self) -> &Dialect {
        self.parser.dialect()
    }

    /// Read the next logical record
    ///
    /// Returns `Ok(None)` at end of input. A record previously returned by
    /// [`peek`](Self::peek) is handed out here and not read again.
    ///
    /// # Errors
    ///
    /// - [`CsvError::MultilineLimitExceeded`] when a record needs more
    ///   physical lines than the configured limit.
    /// - [`CsvError::MalformedRecord`] when the input ends inside a quoted field.
    /// - [`CsvError::Closed`] after [`close`](Self::close), unless the input
    ///   had already been drained.
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        match self.peeked.take() {
            Some(record) => Ok(record),
            None => self.read_record(),
        }
    }

    /// Look at the next record without consuming it
    ///
    /// Repeated calls return the same record until
    /// [`next_record`](Self::next_record) is called.
    pub fn peek(&mut self) -> Result<Option<&Record>> {
        if self.peeked.is_none() {
            let record = self.read_record()?;
            self.peeked = Some(record);
        }
        Ok(self.peeked.as_ref().and_then(|record| record.as_ref()))
    }

    /// Read all remaining records
    pub fn read_all(&mut self) -> Result<Vec<Record>> {
        self.records().collect()
    }

    /// Get iterator over records
    ///
    /// The iterator yields `Err` once for a failing record and then stops.
    ///
    /// # Examples
    ///
    /// ```
    /// use csvstream::csv_reader::CsvReader;
    /// use std::io::Cursor;
    ///
    /// let mut reader = CsvReader::new(Cursor::new("a,b\nc,d\n")).unwrap();
    /// let records: Vec<_> = reader.records().collect::<Result<_, _>>().unwrap();
    /// assert_eq!(records.len(), 2);
    /// ```
    pub fn records(&mut self) -> Records<'_, R> {
        Records {
            reader: self,
            done: false,
        }
    }

    /// Number of physical lines consumed, skipped lines included
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// Number of logical records read
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Release the underlying source
    ///
    /// Closing twice is harmless. A buffered peeked record is dropped.
    pub fn close(&mut self) {
        if self.source.take().is_some() {
            debug!(
                "csv reader closed after {} lines and {} records",
                self.lines_read, self.records_read
            );
        }
        self.peeked = None;
    }

    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    fn read_record(&mut self) -> Result<Option<Record>> {
        if self.source.is_none() {
            if self.exhausted {
                return Ok(None);
            }
            return Err(self.closed_error());
        }
        self.skip_lines()?;

        let separator = self.parser.dialect().separator();
        let mut record: Record = Vec::new();
        let mut lines_in_record: usize = 0;

        loop {
            let line = match self.source.as_mut() {
                Some(source) => source.next_line()?,
                None => return Err(self.closed_error()),
            };
            let Some(line) = line else {
                self.exhausted = true;
                if self.parser.is_pending() {
                    return Err(self.unterminated_error());
                }
                return Ok(None);
            };

            self.lines_read += 1;
            lines_in_record += 1;
            if self.multiline_limit > 0 && lines_in_record > self.multiline_limit {
                let err = self.limit_error();
                self.parser.reset();
                return Err(err);
            }

            if !self.parser.is_pending() && is_blank_line(line, separator) {
                record.push(Some(line.to_string()));
                break;
            }

            if let Some(fields) = self.parser.tokenize_continuable(Some(line))? {
                record.extend(fields);
            }
            if !self.parser.is_pending() {
                break;
            }
        }

        self.records_read += 1;
        trace!(
            "record {}: {} fields from {} lines",
            self.records_read,
            record.len(),
            lines_in_record
        );
        Ok(Some(record))
    }

    fn skip_lines(&mut self) -> Result<()> {
        if self.skip_remaining == 0 {
            return Ok(());
        }
        let requested = self.skip_remaining;
        while self.skip_remaining > 0 {
            let Some(source) = self.source.as_mut() else {
                break;
            };
            if source.next_line()?.is_none() {
                self.skip_remaining = 0;
                break;
            }
            self.lines_read += 1;
            self.skip_remaining -= 1;
        }
        debug!(
            "skipped {} of {} leading lines",
            requested - self.skip_remaining,
            requested
        );
        Ok(())
    }

    fn closed_error(&self) -> CsvError {
        let messages = self.parser.dialect().messages();
        CsvError::Closed {
            message: messages.format(MessageKey::ReaderClosed, &[]),
            locale: messages.locale().clone(),
        }
    }

    fn unterminated_error(&self) -> CsvError {
        let messages = self.parser.dialect().messages();
        let row = self.records_read + 1;
        let context = abbreviate(self.parser.pending_text().unwrap_or_default());
        CsvError::MalformedRecord {
            row,
            message: messages.format(MessageKey::UnterminatedQuote, &[&number(row), &context]),
            context,
            locale: messages.locale().clone(),
        }
    }

    fn limit_error(&self) -> CsvError {
        let messages = self.parser.dialect().messages();
        let row = self.records_read + 1;
        let context = abbreviate(self.parser.pending_text().unwrap_or_default());
        debug!(
            "record {} exceeds the multiline limit of {} lines",
            row, self.multiline_limit
        );
        CsvError::MultilineLimitExceeded {
            limit: self.multiline_limit,
            row,
            message: messages.format(
                MessageKey::MultilineLimitBroken,
                &[&number(self.multiline_limit as u64), &number(row), &context],
            ),
            context,
            locale: messages.locale().clone(),
        }
    }
}

impl<R: BufRead> IntoIterator for CsvReader<R> {
    type Item = Result<Record>;
    type IntoIter = IntoRecords<R>;

    fn into_iter(self) -> Self::IntoIter {
        IntoRecords {
            reader: self,
            done: false,
        }
    }
}

// Only spaces and tabs, and no separator that would split it into fields
fn is_blank_line(line: &str, separator: char) -> bool {
    line.chars()
        .all(|c| (c == ' ' || c == '\t') && c != separator)
}

fn abbreviate(text: &str) -> String {
    if text.chars().count() <= MAX_CONTEXT_CHARS {
        return text.to_string();
    }
    let mut short: String = text.chars().take(MAX_CONTEXT_CHARS - 3).collect();
    short.push_str("...");
    short
}

fn step<R: BufRead>(reader: &mut CsvReader<R>, done: &mut bool) -> Option<Result<Record>> {
    if *done {
        return None;
    }
    match reader.next_record() {
        Ok(Some(record)) => Some(Ok(record)),
        Ok(None) => {
            *done = true;
            None
        }
        Err(e) => {
            *done = true;
            Some(Err(e))
        }
    }
}

/// Iterator over CSV records borrowing the reader
pub struct Records<'a, R> {
    reader: &'a mut CsvReader<R>,
    done: bool,
}

impl<R: BufRead> Iterator for Records<'_, R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        step(self.reader, &mut self.done)
    }
}

impl<R: BufRead> FusedIterator for Records<'_, R> {}

/// Iterator over CSV records owning the reader
pub struct IntoRecords<R> {
    reader: CsvReader<R>,
    done: bool,
}

impl<R> IntoRecords<R> {
    /// Reader behind the iterator, for its counters
    pub fn reader(&self) -> &CsvReader<R> {
        &self.reader
    }
}

impl<R: BufRead> Iterator for IntoRecords<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        step(&mut self.reader, &mut self.done)
    }
}

impl<R: BufRead> FusedIterator for IntoRecords<R> {}

/// Builder for [`CsvReader`]
///
/// # Examples
///
/// ```
/// use csvstream::csv::Dialect;
/// use csvstream::csv_reader::CsvReader;
/// use csvstream::messages::Locale;
/// use std::io::Cursor;
///
/// let dialect = Dialect::builder().separator(';').build().unwrap();
/// let reader = CsvReader::builder(Cursor::new("a;b\n"))
///     .dialect(dialect)
///     .error_locale(Locale::german())
///     .multiline_limit(5)
///     .build()
///     .unwrap();
/// assert_eq!(reader.dialect().separator(), ';');
/// ```
#[derive(Debug)]
pub struct CsvReaderBuilder<R> {
    source: R,
    dialect: Dialect,
    error_locale: Option<Locale>,
    null_field_indicator: Option<NullFieldIndicator>,
    skip_lines: usize,
    multiline_limit: usize,
    keep_carriage_return: bool,
    verify_reader: bool,
}

impl<R: BufRead> CsvReaderBuilder<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            dialect: Dialect::default(),
            error_locale: None,
            null_field_indicator: None,
            skip_lines: 0,
            multiline_limit: 0,
            keep_carriage_return: false,
            verify_reader: true,
        }
    }

    /// Set the dialect (builder pattern)
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Override the dialect's diagnostic locale
    pub fn error_locale(mut self, locale: Locale) -> Self {
        self.error_locale = Some(locale);
        self
    }

    /// Override the dialect's null-field indicator
    pub fn null_field_indicator(mut self, indicator: NullFieldIndicator) -> Self {
        self.null_field_indicator = Some(indicator);
        self
    }

    /// Discard this many physical lines before the first record
    pub fn skip_lines(mut self, lines: usize) -> Self {
        self.skip_lines = lines;
        self
    }

    /// Maximum physical lines per record; 0 means unlimited
    pub fn multiline_limit(mut self, limit: usize) -> Self {
        self.multiline_limit = limit;
        self
    }

    /// Keep `\r` from `\r\n` terminators so it survives in quoted fields
    pub fn keep_carriage_return(mut self, keep: bool) -> Self {
        self.keep_carriage_return = keep;
        self
    }

    /// Probe the source for readability at build time (default `true`)
    pub fn verify_reader(mut self, verify: bool) -> Self {
        self.verify_reader = verify;
        self
    }

    /// Build the reader
    ///
    /// # Errors
    ///
    /// [`CsvError::Io`] when `verify_reader` is set and the source cannot
    /// be read.
    pub fn build(self) -> Result<CsvReader<R>> {
        let dialect = if self.error_locale.is_some() || self.null_field_indicator.is_some() {
            let mut builder = self.dialect.to_builder();
            if let Some(locale) = self.error_locale {
                builder = builder.error_locale(locale);
            }
            if let Some(indicator) = self.null_field_indicator {
                builder = builder.null_field_indicator(indicator);
            }
            builder.build()?
        } else {
            self.dialect
        };

        let mut source = LineSource::new(self.source).keep_carriage_return(self.keep_carriage_return);
        if self.verify_reader {
            source.probe()?;
        }

        debug!(
            "csv reader ready: separator={:?} quote={:?} escape={:?} skip={} multiline_limit={}",
            dialect.separator(),
            dialect.quote_char(),
            dialect.escape_char(),
            self.skip_lines,
            self.multiline_limit
        );

        Ok(CsvReader {
            source: Some(source),
            parser: CsvParser::new(dialect),
            lines_read: 0,
            records_read: 0,
            skip_remaining: self.skip_lines,
            multiline_limit: self.multiline_limit,
            peeked: None,
            exhausted: false,
        })
    }
}
