//! Atomization: splitting raw names fields into individual names.
//!
//! ```text
//! "Smith, J.; Silva, A. | Smyth, J."
//!        │  names_from_string(delimiters: [";", "|"])
//!        ▼
//! ["Smith, J.", "Silva, A.", "Smyth, J."]
//! ```
//!
//! A [`ReplaceTable`] can rewrite whole field values before they are split,
//! which is how known-bad source strings get fixed without touching the data.

mod listing;
mod replace;

pub use listing::{OrderBy, UnknownOrdering, name_counts, names_list, names_with_counts};
pub use replace::{ReplaceTable, Replacement};

use rustc_hash::FxHashSet;

use crate::base::constants::DEFAULT_DELIMITER;

/// How a names field is split into tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delimiters {
    /// Split on every occurrence of one delimiter.
    Single(String),
    /// Split wherever any of these delimiters occurs.
    ///
    /// When several match at the same position, the earliest listed wins.
    AnyOf(Vec<String>),
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::Single(DEFAULT_DELIMITER.to_string())
    }
}

impl Delimiters {
    /// Split `text` into raw (untrimmed) pieces.
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        match self {
            Self::Single(delimiter) if delimiter.is_empty() => vec![text],
            Self::Single(delimiter) => text.split(delimiter.as_str()).collect(),
            Self::AnyOf(delimiters) => split_any(text, delimiters),
        }
    }
}

fn split_any<'a>(text: &'a str, delimiters: &[String]) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut piece_start = 0;
    let mut cursor = 0;

    while cursor < text.len() {
        let rest = &text[cursor..];
        let matched = delimiters
            .iter()
            .find(|delimiter| !delimiter.is_empty() && rest.starts_with(delimiter.as_str()));
        match matched {
            Some(delimiter) => {
                pieces.push(&text[piece_start..cursor]);
                cursor += delimiter.len();
                piece_start = cursor;
            }
            None => {
                cursor += rest.chars().next().map_or(1, char::len_utf8);
            }
        }
    }
    pieces.push(&text[piece_start..]);
    pieces
}

/// Options for [`names_from_string`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AtomizeOptions {
    pub delimiters: Delimiters,
    /// Return each name once.
    pub unique: bool,
    /// With `unique`, keep first-appearance order instead of sorting.
    pub preserve_order: bool,
}

impl AtomizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiters = Delimiters::Single(delimiter.into());
        self
    }

    pub fn with_delimiters<I, S>(mut self, delimiters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.delimiters = Delimiters::AnyOf(delimiters.into_iter().map(Into::into).collect());
        self
    }

    pub fn unique(mut self, preserve_order: bool) -> Self {
        self.unique = true;
        self.preserve_order = preserve_order;
        self
    }
}

/// Split a names string into trimmed, non-empty names.
pub fn names_from_string(names: &str, options: &AtomizeOptions) -> Vec<String> {
    let tokens = options
        .delimiters
        .split(names)
        .into_iter()
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if !options.unique {
        return tokens.map(str::to_string).collect();
    }

    let mut seen = FxHashSet::default();
    let mut unique: Vec<String> = tokens
        .filter(|token| seen.insert(*token))
        .map(str::to_string)
        .collect();
    if !options.preserve_order {
        unique.sort();
    }
    unique
}

/// Atomize every field of a names column.
///
/// Each field is first looked up in `replaces` (whole-value match), then
/// split by `operation`.
pub fn atomize_names<S, F>(
    column: &[S],
    operation: F,
    replaces: Option<&ReplaceTable>,
) -> Vec<Vec<String>>
where
    S: AsRef<str>,
    F: Fn(&str) -> Vec<String>,
{
    column
        .iter()
        .map(|field| {
            let field = field.as_ref();
            operation(replaces.map_or(field, |table| table.replace(field)))
        })
        .collect()
}
