//! Error types for tokenizing, reading and writing CSV

use crate::messages::Locale;
use thiserror::Error;

/// Errors produced by the tokenizer, the record reader and the writer
///
/// Diagnostic variants carry a message that was already rendered in the
/// locale configured on the dialect, together with the structured values
/// (row number, context, limit) used to build it.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Separator, quote and escape characters are invalid together
    #[error("{message}")]
    Configuration { message: String, locale: Locale },

    /// A quoted field was still open when the line (or the input) ended
    #[error("{message}")]
    MalformedRecord {
        row: u64,
        context: String,
        message: String,
        locale: Locale,
    },

    /// A logical record spanned more physical lines than allowed
    #[error("{message}")]
    MultilineLimitExceeded {
        limit: usize,
        row: u64,
        context: String,
        message: String,
        locale: Locale,
    },

    /// The reader was closed before the operation
    #[error("{message}")]
    Closed { message: String, locale: Locale },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CsvError {
    /// Row number the diagnostic refers to, if any
    pub fn row(&self) -> Option<u64> {
        match self {
            CsvError::MalformedRecord { row, .. } | CsvError::MultilineLimitExceeded { row, .. } => {
                Some(*row)
            }
            _ => None,
        }
    }

    /// Unparsed or buffered text attached to the diagnostic
    pub fn context(&self) -> Option<&str> {
        match self {
            CsvError::MalformedRecord { context, .. }
            | CsvError::MultilineLimitExceeded { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Locale the message was rendered in
    pub fn locale(&self) -> Option<&Locale> {
        match self {
            CsvError::Configuration { locale, .. }
            | CsvError::MalformedRecord { locale, .. }
            | CsvError::MultilineLimitExceeded { locale, .. }
            | CsvError::Closed { locale, .. } => Some(locale),
            CsvError::Io(_) => None,
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, CsvError>;
