//! Dialect configuration shared by the parser and the encoder

use crate::error::{CsvError, Result};
use crate::messages::{Locale, MessageCatalog, MessageKey, Messages};
use crate::types::{
    NullFieldIndicator, DEFAULT_ESCAPE_CHARACTER, DEFAULT_QUOTE_CHARACTER, DEFAULT_SEPARATOR,
    NULL_CHARACTER,
};
use std::sync::Arc;

/// Immutable, validated set of tokenizing options
///
/// Built once through [`DialectBuilder`] and then shared read-only by
/// [`CsvParser`](crate::csv::CsvParser) and [`CsvEncoder`](crate::csv::CsvEncoder).
///
/// # Examples
///
/// ```
/// use csvstream::csv::Dialect;
///
/// let dialect = Dialect::builder()
///     .separator(';')
///     .quote_char('\'')
///     .build()
///     .unwrap();
/// assert_eq!(dialect.separator(), ';');
/// ```
#[derive(Debug, Clone)]
pub struct Dialect {
    separator: char,
    quote: char,
    escape: char,
    strict_quotes: bool,
    ignore_leading_whitespace: bool,
    ignore_quotations: bool,
    null_field_indicator: NullFieldIndicator,
    messages: Messages,
}

impl Dialect {
    /// Start building a dialect from the defaults
    pub fn builder() -> DialectBuilder {
        DialectBuilder::default()
    }

    /// Builder pre-filled with this dialect's settings
    pub fn to_builder(&self) -> DialectBuilder {
        DialectBuilder {
            separator: self.separator,
            quote: self.quote,
            escape: self.escape,
            strict_quotes: self.strict_quotes,
            ignore_leading_whitespace: self.ignore_leading_whitespace,
            ignore_quotations: self.ignore_quotations,
            null_field_indicator: self.null_field_indicator,
            messages: self.messages.clone(),
        }
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    /// Quote character, `NULL_CHARACTER` when quoting is disabled
    pub fn quote_char(&self) -> char {
        self.quote
    }

    /// Escape character, `NULL_CHARACTER` when escaping is disabled
    pub fn escape_char(&self) -> char {
        self.escape
    }

    pub fn strict_quotes(&self) -> bool {
        self.strict_quotes
    }

    pub fn ignore_leading_whitespace(&self) -> bool {
        self.ignore_leading_whitespace
    }

    pub fn ignore_quotations(&self) -> bool {
        self.ignore_quotations
    }

    pub fn null_field_indicator(&self) -> NullFieldIndicator {
        self.null_field_indicator
    }

    pub fn error_locale(&self) -> &Locale {
        self.messages.locale()
    }

    pub(crate) fn messages(&self) -> &Messages {
        &self.messages
    }

    pub(crate) fn is_quote(&self, c: char) -> bool {
        self.quote != NULL_CHARACTER && c == self.quote
    }

    pub(crate) fn is_escape(&self, c: char) -> bool {
        self.escape != NULL_CHARACTER && c == self.escape
    }

    pub(crate) fn has_quote(&self) -> bool {
        self.quote != NULL_CHARACTER
    }

    pub(crate) fn has_escape(&self) -> bool {
        self.escape != NULL_CHARACTER
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect {
            separator: DEFAULT_SEPARATOR,
            quote: DEFAULT_QUOTE_CHARACTER,
            escape: DEFAULT_ESCAPE_CHARACTER,
            strict_quotes: false,
            ignore_leading_whitespace: true,
            ignore_quotations: false,
            null_field_indicator: NullFieldIndicator::Neither,
            messages: Messages::default(),
        }
    }
}

/// Builder for [`Dialect`]; validation happens in [`build`](Self::build)
#[derive(Debug, Clone)]
pub struct DialectBuilder {
    separator: char,
    quote: char,
    escape: char,
    strict_quotes: bool,
    ignore_leading_whitespace: bool,
    ignore_quotations: bool,
    null_field_indicator: NullFieldIndicator,
    messages: Messages,
}

impl Default for DialectBuilder {
    fn default() -> Self {
        Dialect::default().to_builder()
    }
}

impl DialectBuilder {
    /// Set the field separator (builder pattern)
    pub fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Set the quote character; `NULL_CHARACTER` disables quoting
    pub fn quote_char(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    /// Set the escape character; `NULL_CHARACTER` disables escaping
    pub fn escape_char(mut self, escape: char) -> Self {
        self.escape = escape;
        self
    }

    /// Discard characters outside quoted spans
    pub fn strict_quotes(mut self, strict: bool) -> Self {
        self.strict_quotes = strict;
        self
    }

    /// Drop whitespace in front of an opening quote
    pub fn ignore_leading_whitespace(mut self, ignore: bool) -> Self {
        self.ignore_leading_whitespace = ignore;
        self
    }

    /// Treat the quote character as ordinary data
    pub fn ignore_quotations(mut self, ignore: bool) -> Self {
        self.ignore_quotations = ignore;
        self
    }

    pub fn null_field_indicator(mut self, indicator: NullFieldIndicator) -> Self {
        self.null_field_indicator = indicator;
        self
    }

    /// Locale used to render diagnostics
    pub fn error_locale(mut self, locale: Locale) -> Self {
        self.messages = Messages::new(locale, self.catalog_handle());
        self
    }

    /// Replace the message catalog (defaults to [`BuiltinCatalog`](crate::messages::BuiltinCatalog))
    pub fn catalog(mut self, catalog: Arc<dyn MessageCatalog>) -> Self {
        self.messages = Messages::new(self.messages.locale().clone(), catalog);
        self
    }

    fn catalog_handle(&self) -> Arc<dyn MessageCatalog> {
        self.messages.catalog()
    }

    /// Validate the characters and produce the dialect
    ///
    /// Fails with [`CsvError::Configuration`] when the separator is the
    /// disabled sentinel, or when any two enabled characters among
    /// separator, quote and escape are equal.
    pub fn build(self) -> Result<Dialect> {
        if self.separator == NULL_CHARACTER {
            return Err(self.configuration_error(MessageKey::DefineSeparator));
        }

        let quote_enabled = self.quote != NULL_CHARACTER;
        let escape_enabled = self.escape != NULL_CHARACTER;
        let collides = (quote_enabled && self.quote == self.separator)
            || (escape_enabled && self.escape == self.separator)
            || (quote_enabled && escape_enabled && self.quote == self.escape);
        if collides {
            return Err(self.configuration_error(MessageKey::SpecialCharactersMustDiffer));
        }

        Ok(Dialect {
            separator: self.separator,
            quote: self.quote,
            escape: self.escape,
            strict_quotes: self.strict_quotes,
            ignore_leading_whitespace: self.ignore_leading_whitespace,
            ignore_quotations: self.ignore_quotations,
            null_field_indicator: self.null_field_indicator,
            messages: self.messages,
        })
    }

    fn configuration_error(&self, key: MessageKey) -> CsvError {
        CsvError::Configuration {
            message: self.messages.format(key, &[]),
            locale: self.messages.locale().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dialect() {
        let dialect = Dialect::default();
        assert_eq!(dialect.separator(), ',');
        assert_eq!(dialect.quote_char(), '"');
        assert_eq!(dialect.escape_char(), '\\');
        assert!(!dialect.strict_quotes());
        assert!(dialect.ignore_leading_whitespace());
        assert!(!dialect.ignore_quotations());
        assert_eq!(dialect.null_field_indicator(), NullFieldIndicator::Neither);
        assert_eq!(dialect.error_locale(), &Locale::english());
    }

    #[test]
    fn test_quote_and_escape_cannot_be_the_same() {
        let result = Dialect::builder().escape_char('"').build();
        assert!(matches!(result, Err(CsvError::Configuration { .. })));
    }

    #[test]
    fn test_quote_and_escape_can_both_be_disabled() {
        let dialect = Dialect::builder()
            .quote_char(NULL_CHARACTER)
            .escape_char(NULL_CHARACTER)
            .build()
            .unwrap();
        assert!(!dialect.has_quote());
        assert!(!dialect.has_escape());
    }

    #[test]
    fn test_separator_cannot_be_disabled() {
        let result = Dialect::builder().separator(NULL_CHARACTER).build();
        assert!(matches!(result, Err(CsvError::Configuration { .. })));
    }

    #[test]
    fn test_separator_and_escape_cannot_be_the_same() {
        let result = Dialect::builder().escape_char(',').build();
        assert!(matches!(result, Err(CsvError::Configuration { .. })));
    }

    #[test]
    fn test_separator_and_quote_message_is_localized() {
        let english = Dialect::builder().quote_char(',').build().unwrap_err();
        let german = Dialect::builder()
            .quote_char(',')
            .error_locale(Locale::german())
            .build()
            .unwrap_err();
        assert_ne!(english.to_string(), german.to_string());
        assert_eq!(german.locale(), Some(&Locale::german()));
    }

    #[test]
    fn test_portuguese_message() {
        let err = Dialect::builder()
            .quote_char(',')
            .error_locale(Locale::brazilian_portuguese())
            .build()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "O separador, delimitador de texto e caractere de escape precisam ser diferentes!"
        );
    }

    #[test]
    fn test_disabled_escape_may_match_nothing() {
        let dialect = Dialect::builder()
            .escape_char(NULL_CHARACTER)
            .build()
            .unwrap();
        assert!(!dialect.is_escape('\0'));
        assert!(dialect.is_quote('"'));
    }
}
