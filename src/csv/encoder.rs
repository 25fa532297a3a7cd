//! CSV encoding: the inverse of the line tokenizer

use crate::csv::dialect::Dialect;
use crate::types::{AsField, NullFieldIndicator};

/// CSV encoder for writing a record as one dialect-conformant line
pub struct CsvEncoder {
    dialect: Dialect,
}

impl CsvEncoder {
    /// Create a new CSV encoder for a dialect
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Format a record into a new string, without a line terminator
    pub fn format_record<F: AsField>(&self, fields: &[F], quote_all: bool) -> String {
        let mut buffer = String::new();
        self.encode_row(fields, quote_all, &mut buffer);
        buffer
    }

    /// Encode entire row into buffer
    pub fn encode_row<F: AsField>(&self, fields: &[F], quote_all: bool, buffer: &mut String) {
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                buffer.push(self.dialect.separator());
            }
            self.encode_field(field.as_field(), quote_all, buffer);
        }
    }

    /// Encode single field with proper quoting/escaping
    fn encode_field(&self, field: Option<&str>, quote_all: bool, buffer: &mut String) {
        let indicator = self.dialect.null_field_indicator();
        let Some(value) = field else {
            let quoted = match indicator {
                NullFieldIndicator::EmptyQuotes => true,
                NullFieldIndicator::Neither => quote_all,
                NullFieldIndicator::EmptySeparators | NullFieldIndicator::Both => false,
            };
            if quoted && self.can_quote() {
                buffer.push(self.dialect.quote_char());
                buffer.push(self.dialect.quote_char());
            }
            return;
        };

        let quoted = self.can_quote()
            && (quote_all
                || self.needs_quoting(value)
                || (value.is_empty() && indicator == NullFieldIndicator::EmptySeparators));

        if quoted {
            buffer.push(self.dialect.quote_char());
        }
        for ch in value.chars() {
            if self.dialect.is_escape(ch) {
                buffer.push(ch);
                buffer.push(ch);
            } else if quoted && self.dialect.is_quote(ch) {
                if self.dialect.has_escape() {
                    // Escape quotes: " -> \"
                    buffer.push(self.dialect.escape_char());
                } else {
                    // Escape quotes by doubling: " -> ""
                    buffer.push(ch);
                }
                buffer.push(ch);
            } else {
                buffer.push(ch);
            }
        }
        if quoted {
            buffer.push(self.dialect.quote_char());
        }
    }

    fn can_quote(&self) -> bool {
        self.dialect.has_quote() && !self.dialect.ignore_quotations()
    }

    /// Check if field requires quoting
    fn needs_quoting(&self, field: &str) -> bool {
        if self.dialect.strict_quotes() && !field.is_empty() {
            return true;
        }
        field.chars().any(|c| {
            c == self.dialect.separator() || self.dialect.is_quote(c) || c == '\n' || c == '\r'
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::CsvParser;
    use crate::types::NULL_CHARACTER;

    fn encoder(builder: crate::csv::DialectBuilder) -> CsvEncoder {
        CsvEncoder::new(builder.build().unwrap())
    }

    #[test]
    fn test_simple_fields() {
        let encoder = CsvEncoder::new(Dialect::default());
        assert_eq!(encoder.format_record(&["a", "b", "c"], false), "a,b,c");
    }

    #[test]
    fn test_quoted_fields() {
        let encoder = CsvEncoder::new(Dialect::default());
        assert_eq!(encoder.format_record(&["a,b", "c"], false), r#""a,b",c"#);
    }

    #[test]
    fn test_quote_all() {
        let encoder = CsvEncoder::new(Dialect::default());
        assert_eq!(encoder.format_record(&["a", "b"], true), r#""a","b""#);
    }

    #[test]
    fn test_escaped_quotes() {
        let encoder = CsvEncoder::new(Dialect::default());
        assert_eq!(
            encoder.format_record(&[r#"Say "Hello""#, "world"], false),
            r#""Say \"Hello\"",world"#
        );
    }

    #[test]
    fn test_doubled_quotes_without_escape() {
        let encoder = encoder(Dialect::builder().escape_char(NULL_CHARACTER));
        assert_eq!(
            encoder.format_record(&[r#"Say "Hello""#, "world"], false),
            r#""Say ""Hello""",world"#
        );
    }

    #[test]
    fn test_escape_is_doubled() {
        let encoder = CsvEncoder::new(Dialect::default());
        assert_eq!(encoder.format_record(&["C:\\tmp"], false), "C:\\\\tmp");
    }

    #[test]
    fn test_newlines() {
        let encoder = CsvEncoder::new(Dialect::default());
        assert_eq!(
            encoder.format_record(&["Line 1\nLine 2", "normal"], false),
            "\"Line 1\nLine 2\",normal"
        );
        assert_eq!(encoder.format_record(&["a\rb"], false), "\"a\rb\"");
    }

    #[test]
    fn test_empty_fields() {
        let encoder = CsvEncoder::new(Dialect::default());
        assert_eq!(encoder.format_record(&["a", "", "c"], false), "a,,c");
        assert_eq!(encoder.format_record(&["", "", ""], false), ",,");
    }

    #[test]
    fn test_custom_separator() {
        let encoder = encoder(Dialect::builder().separator(';'));
        assert_eq!(encoder.format_record(&["a", "b;c", "d"], false), r#"a;"b;c";d"#);
    }

    #[test]
    fn test_absent_fields() {
        let fields = [Some("a".to_string()), None, Some(String::new())];

        let plain = CsvEncoder::new(Dialect::default());
        assert_eq!(plain.format_record(&fields, false), "a,,");

        let separators =
            encoder(Dialect::builder().null_field_indicator(NullFieldIndicator::EmptySeparators));
        assert_eq!(separators.format_record(&fields, false), r#"a,,"""#);

        let quotes =
            encoder(Dialect::builder().null_field_indicator(NullFieldIndicator::EmptyQuotes));
        assert_eq!(quotes.format_record(&fields, false), r#"a,"","#);
    }

    #[test]
    fn test_absent_fields_round_trip() {
        for indicator in [
            NullFieldIndicator::EmptySeparators,
            NullFieldIndicator::EmptyQuotes,
        ] {
            let dialect = Dialect::builder()
                .null_field_indicator(indicator)
                .build()
                .unwrap();
            let fields = vec![Some("a".to_string()), None, Some(String::new())];
            let line = CsvEncoder::new(dialect.clone()).format_record(&fields, false);
            let mut parser = CsvParser::new(dialect);
            assert_eq!(parser.tokenize_single(Some(line.as_str())).unwrap(), Some(fields));
        }
    }

    #[test]
    fn test_strict_dialect_quotes_non_empty_fields() {
        let encoder = encoder(Dialect::builder().strict_quotes(true));
        assert_eq!(encoder.format_record(&["a", "", "b"], false), r#""a",,"b""#);
    }

    #[test]
    fn test_ignore_quotations_never_wraps() {
        let encoder = encoder(Dialect::builder().ignore_quotations(true));
        assert_eq!(encoder.format_record(&["16\"", "x"], true), "16\",x");
    }

    #[test]
    fn test_quoted_content_round_trips() {
        let dialect = Dialect::default();
        let fields = vec![
            Some("a,b".to_string()),
            Some("say \"hi\"".to_string()),
            Some("two\nlines".to_string()),
            Some("back\\slash".to_string()),
        ];
        let line = CsvEncoder::new(dialect.clone()).format_record(&fields, false);
        let mut parser = CsvParser::new(dialect);
        assert_eq!(parser.tokenize_single(Some(line.as_str())).unwrap(), Some(fields));
    }
}
