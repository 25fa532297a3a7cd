//! Localized diagnostic messages
//!
//! The tokenizer and reader never build message text themselves. They ask a
//! [`MessageCatalog`] for the template of a [`MessageKey`] in the configured
//! [`Locale`] and fill in positional `{0}`, `{1}` arguments.

use indexmap::IndexMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Language tag identifying a message table, e.g. `en`, `de`, `pt-BR`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Locale {
    language: String,
    region: Option<String>,
}

impl Locale {
    /// Create a locale from a language code
    pub fn new(language: &str) -> Self {
        Locale {
            language: language.to_ascii_lowercase(),
            region: None,
        }
    }

    /// Create a locale from a language and region code
    pub fn with_region(language: &str, region: &str) -> Self {
        Locale {
            language: language.to_ascii_lowercase(),
            region: Some(region.to_ascii_uppercase()),
        }
    }

    /// Parse a tag such as `pt-BR`, `pt_BR` or `de`
    pub fn parse(tag: &str) -> Self {
        let mut parts = tag.split(|c| c == '-' || c == '_').filter(|p| !p.is_empty());
        let language = parts.next().unwrap_or("en");
        match parts.next() {
            Some(region) => Locale::with_region(language, region),
            None => Locale::new(language),
        }
    }

    pub fn english() -> Self {
        Locale::new("en")
    }

    pub fn german() -> Self {
        Locale::new("de")
    }

    pub fn french() -> Self {
        Locale::new("fr")
    }

    pub fn brazilian_portuguese() -> Self {
        Locale::with_region("pt", "BR")
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::english()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}-{}", self.language, region),
            None => f.write_str(&self.language),
        }
    }
}

/// Identifier of a diagnostic message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    /// Separator, quote and escape collide. No arguments.
    SpecialCharactersMustDiffer,
    /// Separator is the disabled sentinel. No arguments.
    DefineSeparator,
    /// `{0}` row, `{1}` lost text
    UnterminatedQuote,
    /// `{0}` limit, `{1}` row, `{2}` context
    MultilineLimitBroken,
    /// No arguments.
    ReaderClosed,
}

/// Source of message templates
pub trait MessageCatalog: Send + Sync {
    /// Template for `key` in `locale`, or `None` when the catalog has no entry
    fn template(&self, locale: &Locale, key: MessageKey) -> Option<&str>;
}

/// Catalog compiled into the crate: English, German, French, Brazilian Portuguese
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

type Table = IndexMap<MessageKey, &'static str>;

fn builtin_tables() -> &'static IndexMap<&'static str, Table> {
    static TABLES: OnceLock<IndexMap<&'static str, Table>> = OnceLock::new();
    TABLES.get_or_init(|| {
        let mut tables = IndexMap::new();

        tables.insert(
            "en",
            Table::from([
                (
                    MessageKey::SpecialCharactersMustDiffer,
                    "The separator, quote, and escape characters must be different!",
                ),
                (
                    MessageKey::DefineSeparator,
                    "You must define a separator character.",
                ),
                (
                    MessageKey::UnterminatedQuote,
                    "Un-terminated quoted field at end of CSV line, row: {0}. Beginning of lost text: [{1}]",
                ),
                (
                    MessageKey::MultilineLimitBroken,
                    "Multiline limit of {0} lines exceeded, row: {1}, context: {2}",
                ),
                (MessageKey::ReaderClosed, "The CSV reader has been closed."),
            ]),
        );

        tables.insert(
            "de",
            Table::from([
                (
                    MessageKey::SpecialCharactersMustDiffer,
                    "Trennzeichen, Anführungszeichen und Escape-Zeichen müssen unterschiedlich sein!",
                ),
                (
                    MessageKey::DefineSeparator,
                    "Es muss ein Trennzeichen angegeben werden.",
                ),
                (
                    MessageKey::UnterminatedQuote,
                    "Nicht abgeschlossenes Feld in Anführungszeichen am Ende der CSV-Zeile, row: {0}. Anfang des verlorenen Textes: [{1}]",
                ),
                (
                    MessageKey::MultilineLimitBroken,
                    "Die Höchstzahl von {0} Zeilen pro Datensatz wurde überschritten, row: {1}, context: {2}",
                ),
                (MessageKey::ReaderClosed, "Der CSV-Leser wurde geschlossen."),
            ]),
        );

        tables.insert(
            "fr",
            Table::from([
                (
                    MessageKey::SpecialCharactersMustDiffer,
                    "Le séparateur, le caractère de citation et le caractère d'échappement doivent être différents !",
                ),
                (
                    MessageKey::DefineSeparator,
                    "Un caractère séparateur doit être défini.",
                ),
                (
                    MessageKey::UnterminatedQuote,
                    "Champ entre guillemets non terminé à la fin de la ligne CSV, row: {0}. Début du texte perdu : [{1}]",
                ),
                (
                    MessageKey::MultilineLimitBroken,
                    "Limite de {0} lignes par enregistrement dépassée, row: {1}, context: {2}",
                ),
                (MessageKey::ReaderClosed, "Le lecteur CSV a été fermé."),
            ]),
        );

        let portuguese = Table::from([
            (
                MessageKey::SpecialCharactersMustDiffer,
                "O separador, delimitador de texto e caractere de escape precisam ser diferentes!",
            ),
            (
                MessageKey::DefineSeparator,
                "É necessário definir um caractere separador.",
            ),
            (
                MessageKey::UnterminatedQuote,
                "Campo entre aspas não terminado no fim da linha CSV, row: {0}. Início do texto perdido: [{1}]",
            ),
            (
                MessageKey::MultilineLimitBroken,
                "Limite de {0} linhas por registro excedido, row: {1}, context: {2}",
            ),
            (MessageKey::ReaderClosed, "O leitor CSV foi fechado."),
        ]);
        tables.insert("pt-BR", portuguese.clone());
        tables.insert("pt", portuguese);

        tables
    })
}

fn builtin_template(locale: &Locale, key: MessageKey) -> Option<&'static str> {
    let tables = builtin_tables();
    let tag = locale.to_string();
    tables
        .get(tag.as_str())
        .or_else(|| tables.get(locale.language()))
        .and_then(|table| table.get(&key))
        .copied()
}

impl MessageCatalog for BuiltinCatalog {
    fn template(&self, locale: &Locale, key: MessageKey) -> Option<&str> {
        builtin_template(locale, key)
    }
}

/// A catalog bound to one locale
///
/// Falls back to the built-in English table when the catalog has no
/// template for the requested locale.
#[derive(Clone)]
pub struct Messages {
    locale: Locale,
    catalog: Arc<dyn MessageCatalog>,
}

impl Messages {
    pub fn new(locale: Locale, catalog: Arc<dyn MessageCatalog>) -> Self {
        Messages { locale, catalog }
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub(crate) fn catalog(&self) -> Arc<dyn MessageCatalog> {
        Arc::clone(&self.catalog)
    }

    /// Render `key` with positional arguments
    pub fn format(&self, key: MessageKey, args: &[&str]) -> String {
        let template = self
            .catalog
            .template(&self.locale, key)
            .or_else(|| builtin_template(&self.locale, key))
            .or_else(|| builtin_template(&Locale::english(), key))
            .unwrap_or_default();
        substitute(template, args)
    }
}

impl Default for Messages {
    fn default() -> Self {
        Messages::new(Locale::default(), Arc::new(BuiltinCatalog))
    }
}

impl fmt::Debug for Messages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Messages")
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

/// Render an integer argument
pub fn number(value: u64) -> String {
    itoa::Buffer::new().format(value).to_string()
}

// `{n}` is replaced by `args[n]`; unknown indices are left untouched.
fn substitute(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len() + args.iter().map(|a| a.len()).sum::<usize>());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            let arg = args.get(index)?;
            Some((arg, close))
        });
        match replaced {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
