//! Name normalization.
//!
//! The resolver never hard-codes how a primitive name becomes a normalized
//! name; it only needs something implementing [`Normalizer`]. Any
//! `Fn(&str) -> String` closure qualifies, and [`DefaultNormalizer`] provides
//! the usual heuristic for collector names:
//!
//! ```text
//! "Smith, J."  → lowercase, drop periods  → "smith, j"
//!              → split on ',' and trim    → ["smith", "j"]
//!              → decompose, keep a-z      → "smith,j"
//! ```

use std::fmt;
use std::sync::Arc;

use unicode_normalization::UnicodeNormalization;

/// A pure, deterministic mapping from a primitive name to its normalized form.
///
/// Implementations must be `Send + Sync`: batches of names are normalized in
/// parallel.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, name: &str) -> String;
}

impl<F> Normalizer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn normalize(&self, name: &str) -> String {
        self(name)
    }
}

/// Shared handle to a normalizer, as stored by the resolver.
pub type SharedNormalizer = Arc<dyn Normalizer>;

/// Unicode normalization form applied before non-ASCII letters are dropped.
///
/// Decomposing forms (`Nfd`, `Nfkd`) split accented letters into a base
/// letter plus combining mark, so the base letter survives. Composing forms
/// drop accented letters entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NormalizationForm {
    Nfc,
    Nfd,
    Nfkc,
    #[default]
    Nfkd,
}

impl fmt::Display for NormalizationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Nfc => "NFC",
            Self::Nfd => "NFD",
            Self::Nfkc => "NFKC",
            Self::Nfkd => "NFKD",
        };
        f.write_str(name)
    }
}

/// The default collector-name normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DefaultNormalizer {
    pub form: NormalizationForm,
}

impl DefaultNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different Unicode normalization form.
    pub fn with_form(mut self, form: NormalizationForm) -> Self {
        self.form = form;
        self
    }
}

impl Normalizer for DefaultNormalizer {
    fn normalize(&self, name: &str) -> String {
        normalize_name(name, self.form)
    }
}

/// Normalize a collector name.
///
/// Lowercases, removes periods, splits on commas, and keeps only ASCII
/// letters of each comma-separated part after Unicode normalization. Parts
/// are re-joined with `,` so "surname, initials" structure survives.
pub fn normalize_name(name: &str, form: NormalizationForm) -> String {
    let lowered = name.to_lowercase().replace('.', "");
    lowered
        .split(',')
        .map(|part| fold_ascii_letters(part.trim(), form))
        .collect::<Vec<_>>()
        .join(",")
}

fn fold_ascii_letters(part: &str, form: NormalizationForm) -> String {
    match form {
        NormalizationForm::Nfc => part.nfc().filter(char::is_ascii_alphabetic).collect(),
        NormalizationForm::Nfd => part.nfd().filter(char::is_ascii_alphabetic).collect(),
        NormalizationForm::Nfkc => part.nfkc().filter(char::is_ascii_alphabetic).collect(),
        NormalizationForm::Nfkd => part.nfkd().filter(char::is_ascii_alphabetic).collect(),
    }
}
