//! CSV utilities for tokenizing, encoding and reading physical lines

mod dialect;
mod encoder;
mod lines;
mod parser;

pub use dialect::{Dialect, DialectBuilder};
pub use encoder::CsvEncoder;
pub use lines::LineSource;
pub use parser::CsvParser;
