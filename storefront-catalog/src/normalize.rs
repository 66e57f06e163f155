//! Text to slug normalization.
//!
//! Display names arrive in every shape imaginable ("YC MILK F/WASH 100ML",
//! "Niacinamide 10% + Zinc 1%"). The normalizer lower-cases them, spells out a
//! small table of symbols as words, turns separators into hyphens, and drops
//! everything else outside `[a-z0-9-]`.

use std::collections::HashMap;

use thiserror::Error;

use crate::slug::Slug;

/// Slug used when nothing of the input survives normalization.
pub const FALLBACK_SLUG: &str = "product";

/// Symbols spelled out as words, in the order they are listed to users.
const DEFAULT_SYMBOLS: &[(char, &str)] = &[
    ('&', "and"),
    ('+', "plus"),
    ('@', "at"),
    ('%', "percent"),
    ('#', "number"),
    ('₹', "rs"),
    ('$', "dollar"),
    ('€', "euro"),
    ('£', "pound"),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Symbol key must be a single character, got {0:?}")]
    InvalidSymbol(String),
    #[error("Replacement for {symbol:?} normalizes to nothing: {word:?}")]
    EmptyReplacement { symbol: char, word: String },
}

/// Symbol → word replacement table applied before cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    entries: Vec<(char, String)>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self {
            entries: DEFAULT_SYMBOLS
                .iter()
                .map(|(c, w)| (*c, (*w).to_string()))
                .collect(),
        }
    }
}

impl SymbolTable {
    /// A table with no replacements at all.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add or replace the word for `symbol`.
    ///
    /// Symbols are matched against lower-cased text, so the key is lower-cased
    /// here too. The word is cleaned to slug characters; a word that cleans to
    /// nothing is rejected.
    pub fn insert(&mut self, symbol: char, word: &str) -> Result<(), ConfigError> {
        let mut lowered = symbol.to_lowercase();
        let key = match (lowered.next(), lowered.next()) {
            (Some(c), None) => c,
            _ => return Err(ConfigError::InvalidSymbol(symbol.to_string())),
        };

        let cleaned = clean(&word.to_lowercase());
        if cleaned.is_empty() {
            return Err(ConfigError::EmptyReplacement {
                symbol,
                word: word.to_string(),
            });
        }

        match self.entries.iter_mut().find(|(c, _)| *c == key) {
            Some(entry) => entry.1 = cleaned,
            None => self.entries.push((key, cleaned)),
        }
        Ok(())
    }

    /// The default table with `extra` entries merged over it.
    ///
    /// Keys are strings so the table can come straight from a TOML map.
    pub fn with_extra(extra: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut table = Self::default();
        let mut keys: Vec<_> = extra.keys().collect();
        keys.sort();
        for key in keys {
            let mut chars = key.chars();
            let symbol = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => return Err(ConfigError::InvalidSymbol(key.clone())),
            };
            table.insert(symbol, &extra[key])?;
        }
        Ok(table)
    }

    pub fn word_for(&self, symbol: char) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _)| *c == symbol)
            .map(|(_, w)| w.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &str)> {
        self.entries.iter().map(|(c, w)| (*c, w.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Turns display text into slugs using a [`SymbolTable`].
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    symbols: SymbolTable,
}

impl Normalizer {
    pub fn new(symbols: SymbolTable) -> Self {
        Self { symbols }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Normalize `text` into a slug. Never fails; empty results become
    /// [`FALLBACK_SLUG`].
    pub fn normalize(&self, text: &str) -> Slug {
        let lowered = text.to_lowercase();

        let mut expanded = String::with_capacity(lowered.len());
        for c in lowered.chars() {
            match self.symbols.word_for(c) {
                Some(word) => {
                    expanded.push('-');
                    expanded.push_str(word);
                    expanded.push('-');
                }
                None => expanded.push(c),
            }
        }

        let cleaned = clean(&expanded);
        if cleaned.is_empty() {
            Slug::from_clean(FALLBACK_SLUG.to_string())
        } else {
            Slug::from_clean(cleaned)
        }
    }
}

/// Normalize `text` with the default symbol table.
///
/// ```
/// use storefront_catalog::normalize;
///
/// assert_eq!(normalize("YC MILK F/WASH 100ML"), "yc-milk-f-wash-100ml");
/// assert_eq!(normalize("Primer & Matte"), "primer-and-matte");
/// assert_eq!(normalize("!!!"), "product");
/// ```
pub fn normalize(text: &str) -> Slug {
    Normalizer::default().normalize(text)
}

/// Separators that become a hyphen.
fn is_separator(c: char) -> bool {
    matches!(c, '/' | '\\' | '|' | '_') || c.is_whitespace()
}

/// Reduce already lower-cased text to slug characters.
///
/// Separators and hyphens mark a break between kept characters; any run of
/// breaks yields exactly one hyphen, and breaks at either end are dropped.
/// Everything outside `[a-z0-9]` that is not a break is removed.
pub(crate) fn clean(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '-' || is_separator(c) {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
        }
    }
    if out.ends_with('-') {
        out.pop();
    }
    out
}
