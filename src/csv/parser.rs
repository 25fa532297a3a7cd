//! Line tokenizer with support for quoted fields spanning several lines

use crate::csv::dialect::Dialect;
use crate::csv::encoder::CsvEncoder;
use crate::error::{CsvError, Result};
use crate::messages::{number, MessageKey};
use crate::types::{AsField, Field, Record};
use log::warn;

/// Extra capacity reserved for a field buffer beyond the line length
const READ_BUFFER_SIZE: usize = 128;

/// CSV tokenizer for one input stream
///
/// Turns one physical line at a time into fields. A quoted field left open
/// at the end of a line either fails ([`tokenize_single`](Self::tokenize_single))
/// or is kept pending until the next call to
/// [`tokenize_continuable`](Self::tokenize_continuable).
///
/// # Examples
///
/// ```
/// use csvstream::csv::CsvParser;
///
/// let mut parser = CsvParser::default();
/// let first = parser.tokenize_continuable(Some("a,\"multi")).unwrap().unwrap();
/// assert_eq!(first, vec![Some("a".to_string())]);
/// assert!(parser.is_pending());
///
/// let rest = parser.tokenize_continuable(Some("line\",b")).unwrap().unwrap();
/// assert_eq!(rest, vec![Some("multi\nline".to_string()), Some("b".to_string())]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CsvParser {
    dialect: Dialect,
    pending: Option<String>,
    in_field: bool,
    fields_on_last_line: usize,
    lines_seen: u64,
}

impl CsvParser {
    /// Create a parser for a validated dialect
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            pending: None,
            in_field: false,
            fields_on_last_line: 0,
            lines_seen: 0,
        }
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Parse exactly one physical line
    ///
    /// Returns `Ok(None)` for absent input. A pending continuation left by
    /// [`tokenize_continuable`](Self::tokenize_continuable) is discarded and
    /// the line is parsed from a clean state. A quote still open at the end
    /// of the line is a [`CsvError::MalformedRecord`] carrying the lost text.
    pub fn tokenize_single(&mut self, line: Option<&str>) -> Result<Option<Record>> {
        self.parse(line, false)
    }

    /// Parse one physical line, carrying an open quoted field into the next call
    ///
    /// Returns only the fields completed on this line. With absent input
    /// while a field is pending, the buffered text is returned as the final
    /// field and the pending state is cleared.
    pub fn tokenize_continuable(&mut self, line: Option<&str>) -> Result<Option<Record>> {
        self.parse(line, true)
    }

    /// Whether a quoted field is waiting for continuation text
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Text buffered for the pending field, including the re-inserted newline
    pub fn pending_text(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Drops any pending continuation without producing a record
    pub(crate) fn reset(&mut self) {
        self.pending = None;
        self.in_field = false;
    }

    /// Whether the character at `position` is an escape followed by an escapable character
    ///
    /// `position` is a character index into `text`. Escapable characters are
    /// the quote and the escape character itself; escaping only applies
    /// when `in_quotes` is set.
    pub fn next_char_is_escapable(&self, text: &str, in_quotes: bool, position: usize) -> bool {
        let mut chars = text.chars().skip(position);
        match (chars.next(), chars.next()) {
            (Some(current), Some(next)) => {
                in_quotes && self.dialect.is_escape(current) && self.is_escapable(next)
            }
            _ => false,
        }
    }

    /// Join fields into one line of this dialect
    pub fn format_record<F: AsField>(&self, fields: &[F], force_quote_all: bool) -> String {
        CsvEncoder::new(self.dialect.clone()).format_record(fields, force_quote_all)
    }

    fn is_escapable(&self, c: char) -> bool {
        self.dialect.is_quote(c) || self.dialect.is_escape(c)
    }

    // Quote or escape handling sees an open field as quoted context.
    fn quoted_context(&self, in_quotes: bool) -> bool {
        (in_quotes && !self.dialect.ignore_quotations()) || self.in_field
    }

    fn escapable_at(&self, chars: &[char], in_quotes: bool, i: usize) -> bool {
        in_quotes && chars.get(i + 1).is_some_and(|&c| self.is_escapable(c))
    }

    fn escaped_quote_at(&self, chars: &[char], in_quotes: bool, i: usize) -> bool {
        in_quotes && chars.get(i + 1).is_some_and(|&c| self.dialect.is_quote(c))
    }

    fn parse(&mut self, line: Option<&str>, multi: bool) -> Result<Option<Record>> {
        if !multi && self.pending.is_some() {
            warn!(
                "discarding pending quoted field after {} lines: single-line parse requested",
                self.lines_seen
            );
            self.reset();
        }

        let Some(line) = line else {
            self.in_field = false;
            return Ok(self.pending.take().map(|text| vec![Some(text)]));
        };

        self.lines_seen += 1;
        let separator = self.dialect.separator();
        let strict = self.dialect.strict_quotes();
        let ignore_quotations = self.dialect.ignore_quotations();

        let chars: Vec<char> = line.chars().collect();
        let mut fields: Record = Vec::with_capacity(self.fields_on_last_line + 1);
        let mut current = String::with_capacity(line.len() + READ_BUFFER_SIZE);
        let mut in_quotes = false;
        let mut from_quoted_field = false;

        if let Some(pending) = self.pending.take() {
            current.push_str(&pending);
            in_quotes = !ignore_quotations;
        }

        let mut i = 0;
        while i < chars.len() {
            let ch = chars[i];

            if self.dialect.is_escape(ch) {
                if !strict {
                    self.in_field = true;
                }
                if self.escapable_at(&chars, self.quoted_context(in_quotes), i) {
                    current.push(chars[i + 1]);
                    i += 1;
                }
            } else if self.dialect.is_quote(ch) {
                if self.escaped_quote_at(&chars, self.quoted_context(in_quotes), i) {
                    // Doubled quote
                    current.push(chars[i + 1]);
                    i += 1;
                } else {
                    in_quotes = !in_quotes;
                    if current.is_empty() {
                        from_quoted_field = true;
                    }
                    // Embedded quote in the middle of a field: a,bc"d"ef,g
                    if !strict
                        && i > 0
                        && chars[i - 1] != separator
                        && chars.get(i + 1).is_some_and(|&next| next != separator)
                    {
                        let leading_whitespace = !current.is_empty()
                            && current.chars().all(|c| c == ' ' || c == '\t');
                        if leading_whitespace {
                            // Opening quote after leading whitespace
                            if self.dialect.ignore_leading_whitespace() {
                                current.clear();
                            }
                        } else {
                            current.push(ch);
                        }
                    }
                }
                self.in_field = !self.in_field;
            } else if ch == separator && !(in_quotes && !ignore_quotations) {
                fields.push(self.finish_field(std::mem::take(&mut current), from_quoted_field));
                from_quoted_field = false;
                self.in_field = false;
            } else if !strict || (in_quotes && !ignore_quotations) {
                current.push(ch);
                self.in_field = true;
                from_quoted_field = true;
            }

            i += 1;
        }

        if in_quotes && !ignore_quotations {
            if multi {
                current.push('\n');
                self.pending = Some(current);
            } else {
                self.in_field = false;
                let messages = self.dialect.messages();
                let row = self.lines_seen;
                return Err(CsvError::MalformedRecord {
                    row,
                    message: messages.format(MessageKey::UnterminatedQuote, &[&number(row), &current]),
                    context: current,
                    locale: messages.locale().clone(),
                });
            }
        } else {
            self.in_field = false;
            fields.push(self.finish_field(current, from_quoted_field));
        }

        self.fields_on_last_line = fields.len();
        Ok(Some(fields))
    }

    fn finish_field(&self, value: String, from_quoted_field: bool) -> Field {
        if value.is_empty()
            && self
                .dialect
                .null_field_indicator()
                .is_null(from_quoted_field)
        {
            None
        } else {
            Some(value)
        }
    }
}
