//! Type definitions shared by the tokenizer, reader and writer

use std::fmt;

/// Disabled sentinel for the quote and escape characters
pub const NULL_CHARACTER: char = '\0';
/// Default field separator
pub const DEFAULT_SEPARATOR: char = ',';
/// Default quote character
pub const DEFAULT_QUOTE_CHARACTER: char = '"';
/// Default escape character
pub const DEFAULT_ESCAPE_CHARACTER: char = '\\';

/// One field of a record: `None` is an absent ("null") value
pub type Field = Option<String>;

/// One logical record, in field order
pub type Record = Vec<Field>;

/// Which empty fields are turned into absent values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NullFieldIndicator {
    /// Empty fields are always empty strings
    #[default]
    Neither,
    /// Two adjacent separators produce an absent field
    EmptySeparators,
    /// An explicit empty quote pair (`""`) produces an absent field
    EmptyQuotes,
    /// Both forms produce an absent field
    Both,
}

impl NullFieldIndicator {
    /// Whether an empty field written in the given form becomes absent
    pub fn is_null(&self, from_quoted_field: bool) -> bool {
        match self {
            NullFieldIndicator::Neither => false,
            NullFieldIndicator::EmptySeparators => !from_quoted_field,
            NullFieldIndicator::EmptyQuotes => from_quoted_field,
            NullFieldIndicator::Both => true,
        }
    }
}

impl fmt::Display for NullFieldIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NullFieldIndicator::Neither => "NEITHER",
            NullFieldIndicator::EmptySeparators => "EMPTY_SEPARATORS",
            NullFieldIndicator::EmptyQuotes => "EMPTY_QUOTES",
            NullFieldIndicator::Both => "BOTH",
        };
        f.write_str(name)
    }
}

/// Anything that can be written as a single field
///
/// Lets the encoder accept `&[&str]`, `&[String]` and whole records
/// (`&[Option<String>]`) alike.
pub trait AsField {
    fn as_field(&self) -> Option<&str>;
}

impl AsField for str {
    fn as_field(&self) -> Option<&str> {
        Some(self)
    }
}

impl AsField for String {
    fn as_field(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl<T: AsField + ?Sized> AsField for &T {
    fn as_field(&self) -> Option<&str> {
        (**self).as_field()
    }
}

impl<T: AsField> AsField for Option<T> {
    fn as_field(&self) -> Option<&str> {
        self.as_ref().and_then(|v| v.as_field())
    }
}
