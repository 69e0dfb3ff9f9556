//! Whole-value replacements applied before atomization.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::trace;

/// What a matched field value is replaced with.
#[derive(Clone)]
pub enum Replacement {
    /// A fixed string.
    Literal(String),
    /// Computed from the matched source value.
    Computed(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl Replacement {
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    pub fn computed(f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self::Computed(Arc::new(f))
    }

    /// The replacement for `source`.
    pub fn apply(&self, source: &str) -> String {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Computed(f) => f(source),
        }
    }
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Source value → replacement value, resolved when rules are registered.
///
/// Computed replacements run once, at registration; lookups afterwards are
/// plain string matches. A source registered twice keeps its latest value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaceTable {
    entries: IndexMap<String, String>,
}

impl ReplaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one rule: every value in `sources` becomes `replacement`.
    pub fn add_rule<I, S>(&mut self, sources: I, replacement: &Replacement)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for source in sources {
            let source = source.into();
            let value = replacement.apply(&source);
            trace!(source = %source, value = %value, "registered replacement");
            self.entries.insert(source, value);
        }
    }

    /// Builder form of [`ReplaceTable::add_rule`].
    pub fn with_rule<I, S>(mut self, sources: I, replacement: Replacement) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_rule(sources, &replacement);
        self
    }

    /// Build a table from `(sources, replacement)` rules, in order.
    pub fn from_rules<I, R, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = (R, Replacement)>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (sources, replacement) in rules {
            table.add_rule(sources, &replacement);
        }
        table
    }

    /// Replacement for a whole field value, if one is registered.
    pub fn get(&self, value: &str) -> Option<&str> {
        self.entries.get(value).map(String::as_str)
    }

    /// Apply the table to a single value, leaving unmatched values as they are.
    pub fn replace<'a>(&'a self, value: &'a str) -> &'a str {
        self.get(value).unwrap_or(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered `(source, value)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_literal_rule_covers_every_source() {
        let table = ReplaceTable::new().with_rule(["s. n.", "s.n.", "sn"], Replacement::literal(""));
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("s.n."), Some(""));
        assert_eq!(table.replace("Silva"), "Silva");
    }

    #[test]
    fn test_computed_rule_is_resolved_at_registration() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let replacement = Replacement::computed(move |s| {
            counter.fetch_add(1, Ordering::SeqCst);
            s.replace(" & ", "; ")
        });

        let table = ReplaceTable::new().with_rule(["Ana & Bia", "Caio & Davi"], replacement);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        assert_eq!(table.get("Ana & Bia"), Some("Ana; Bia"));
        assert_eq!(table.get("Caio & Davi"), Some("Caio; Davi"));
        let _ = table.get("Ana & Bia");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_later_rule_overrides_earlier() {
        let table = ReplaceTable::from_rules([
            (vec!["x"], Replacement::literal("first")),
            (vec!["x", "y"], Replacement::literal("second")),
        ]);
        let pairs: Vec<_> = table.iter().collect();
        assert_eq!(pairs, [("x", "second"), ("y", "second")]);
    }

    #[test]
    fn test_debug_hides_closures() {
        let computed = Replacement::computed(|s: &str| s.to_string());
        assert_eq!(format!("{computed:?}"), "Computed(..)");
        assert_eq!(
            format!("{:?}", Replacement::literal("a")),
            "Literal(\"a\")"
        );
    }
}
