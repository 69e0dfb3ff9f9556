//! Listing and counting names in an atomized column.

use std::str::FromStr;

use indexmap::IndexMap;
use thiserror::Error;

/// Order of a names listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderBy {
    /// First appearance in the column.
    #[default]
    Appearance,
    /// Lexicographic.
    Alphabetic,
    /// Most records first; ties keep first-appearance order.
    Counts,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid ordering '{0}': expected 'appearance', 'alphabetic' or 'counts'")]
pub struct UnknownOrdering(pub String);

impl FromStr for OrderBy {
    type Err = UnknownOrdering;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "appearance" => Ok(Self::Appearance),
            "alphabetic" => Ok(Self::Alphabetic),
            "counts" => Ok(Self::Counts),
            other => Err(UnknownOrdering(other.to_string())),
        }
    }
}

/// Records per name, in first-appearance order.
pub fn name_counts<R, S>(rows: &[R]) -> IndexMap<String, usize>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut counts = IndexMap::new();
    for name in rows.iter().flat_map(|row| row.as_ref()) {
        *counts.entry(name.as_ref().to_string()).or_insert(0) += 1;
    }
    counts
}

/// Each distinct name with its record count.
pub fn names_with_counts<R, S>(rows: &[R], order: OrderBy) -> Vec<(String, usize)>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut counted: Vec<(String, usize)> = name_counts(rows).into_iter().collect();
    match order {
        OrderBy::Appearance => {}
        OrderBy::Alphabetic => counted.sort_by(|a, b| a.0.cmp(&b.0)),
        OrderBy::Counts => counted.sort_by(|a, b| b.1.cmp(&a.1)),
    }
    counted
}

/// Each distinct name once.
pub fn names_list<R, S>(rows: &[R], order: OrderBy) -> Vec<String>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    names_with_counts(rows, order)
        .into_iter()
        .map(|(name, _)| name)
        .collect()
}
