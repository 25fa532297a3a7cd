//! Physical line source

use crate::error::Result;
use std::io::BufRead;

/// Reads one physical line at a time from any buffered source
///
/// Lines end at `\n`. The terminator is removed, together with a
/// preceding `\r` unless `keep_carriage_return` is set. The last line
/// does not need a terminator.
#[derive(Debug)]
pub struct LineSource<R> {
    inner: R,
    buffer: String,
    keep_carriage_return: bool,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buffer: String::with_capacity(1024),
            keep_carriage_return: false,
        }
    }

    /// Keep `\r` of `\r\n` terminators in the returned line (builder pattern)
    pub fn keep_carriage_return(mut self, keep: bool) -> Self {
        self.keep_carriage_return = keep;
        self
    }

    /// Read the next line, `Ok(None)` at end of input
    ///
    /// Invalid UTF-8 surfaces as [`CsvError::Io`](crate::error::CsvError::Io).
    pub fn next_line(&mut self) -> Result<Option<&str>> {
        self.buffer.clear();
        let bytes_read = self.inner.read_line(&mut self.buffer)?;
        if bytes_read == 0 {
            return Ok(None);
        }

        if self.buffer.ends_with('\n') {
            self.buffer.pop();
            if !self.keep_carriage_return && self.buffer.ends_with('\r') {
                self.buffer.pop();
            }
        }
        Ok(Some(&self.buffer))
    }

    /// Check that the source can be read without consuming anything
    pub fn probe(&mut self) -> Result<()> {
        self.inner.fill_buf()?;
        Ok(())
    }
}
