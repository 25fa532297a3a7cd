//! # csvstream
//!
//! Streaming CSV tokenizing and writing for Rust.
//!
//! ## Features
//!
//! - **Line tokenizer** with configurable separator, quote and escape characters
//! - **Multiline records**: quoted fields may contain line breaks
//! - **Safety limit** on the number of physical lines per record
//! - **Null fields**: empty separators and empty quotes can be read as absent values
//! - **Localized diagnostics** through a pluggable message catalog
//! - **Streaming**: one record in memory at a time, any `BufRead`/`Write`
//!
//! ## Quick Start
//!
//! ### Reading
//!
//! ```
//! use csvstream::CsvReader;
//! use std::io::Cursor;
//!
//! let data = "id,comment\n1,\"spans\ntwo lines\"\n";
//! let mut reader = CsvReader::new(Cursor::new(data)).unwrap();
//!
//! for record in reader.records() {
//!     let record = record.unwrap();
//!     println!("{:?}", record);
//! }
//! assert_eq!(reader.lines_read(), 3);
//! assert_eq!(reader.records_read(), 2);
//! ```
//!
//! ### Writing
//!
//! ```
//! use csvstream::CsvWriter;
//!
//! let mut writer = CsvWriter::new(Vec::new());
//! writer.write_row(&["id", "comment"]).unwrap();
//! writer.write_row(&["1", "needs, quoting"]).unwrap();
//! let bytes = writer.into_inner().unwrap();
//! assert_eq!(bytes, b"id,comment\n1,\"needs, quoting\"\n");
//! ```
//!
//! ### Tokenizing single lines
//!
//! ```
//! use csvstream::csv::{CsvParser, Dialect};
//! use csvstream::NullFieldIndicator;
//!
//! let dialect = Dialect::builder()
//!     .null_field_indicator(NullFieldIndicator::EmptySeparators)
//!     .build()
//!     .unwrap();
//! let mut parser = CsvParser::new(dialect);
//! let fields = parser.tokenize_single(Some("a,,\"\"")).unwrap().unwrap();
//! assert_eq!(fields, vec![Some("a".to_string()), None, Some(String::new())]);
//! ```

pub mod csv;
pub mod csv_reader;
pub mod csv_writer;
pub mod error;
pub mod messages;
pub mod types;

pub use csv::{CsvEncoder, CsvParser, Dialect, DialectBuilder};
pub use csv_reader::{CsvReader, CsvReaderBuilder, IntoRecords, Records};
pub use csv_writer::{CsvWriter, LineEnding};
pub use error::{CsvError, Result};
pub use messages::{BuiltinCatalog, Locale, MessageCatalog, MessageKey};
pub use types::{AsField, Field, NullFieldIndicator, Record, NULL_CHARACTER};
