//! Curated remap batches and endpoint promotion.

use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::{debug, warn};

use super::report::InconsistencyReport;
use super::IdentityResolver;
use crate::base::Name;

/// Non-fatal signal: a remap batch named the same source more than once.
///
/// The last occurrence in the batch is the one kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate remap sources, last occurrence kept: {}", .keys.join(", "))]
pub struct DuplicateKeyWarning {
    /// Each repeated source once, in order of first repetition.
    pub keys: Vec<Name>,
}

/// What a remap batch did, plus the consistency check run right after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemapOutcome {
    /// Distinct sources written by the batch.
    pub applied: usize,
    pub duplicates: Option<DuplicateKeyWarning>,
    /// Cycles present in the remapping index after the batch.
    pub inconsistencies: Option<InconsistencyReport>,
}

impl RemapOutcome {
    /// True when the index has no cycles after the batch.
    pub fn is_consistent(&self) -> bool {
        self.inconsistencies.is_none()
    }
}

impl IdentityResolver {
    /// Apply an ordered batch of `(source, target)` redirects.
    ///
    /// With `from_scratch`, the current remapping index is discarded first.
    /// Existing redirects are overwritten freely; a source repeated inside the
    /// batch keeps its last target and is reported in
    /// [`RemapOutcome::duplicates`]. Redirects that end up pointing at
    /// themselves are removed. Cycles are not rejected here: they are
    /// reported in [`RemapOutcome::inconsistencies`].
    pub fn remap<I, K, V>(&mut self, pairs: I, from_scratch: bool) -> RemapOutcome
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        if from_scratch {
            debug!(discarded = self.remapping.len(), "discarding remapping index");
            self.remapping.clear();
        }

        let mut seen = FxHashSet::default();
        let mut repeated = Vec::new();
        for (source, target) in pairs {
            let source = Name::new(source.as_ref());
            if !seen.insert(source.clone()) && !repeated.contains(&source) {
                repeated.push(source.clone());
            }
            self.remapping.insert(source, Name::new(target.as_ref()));
        }
        self.drop_self_loops();

        let duplicates = (!repeated.is_empty()).then(|| DuplicateKeyWarning { keys: repeated });
        if let Some(warning) = &duplicates {
            warn!(keys = ?warning.keys, "{warning}");
        }

        let inconsistencies = self.inconsistencies();
        debug!(
            applied = seen.len(),
            redirects = self.remapping.len(),
            consistent = inconsistencies.is_none(),
            "applied remap batch"
        );

        RemapOutcome {
            applied: seen.len(),
            duplicates,
            inconsistencies,
        }
    }

    /// Make `key` terminal by removing its redirect.
    ///
    /// Returns the target it used to point at, or `None` if it had none.
    pub fn set_endpoint(&mut self, key: &str) -> Option<Name> {
        let previous = self.remapping.shift_remove(key);
        if let Some(target) = &previous {
            debug!(key, previous = %target, "promoted name to endpoint");
        }
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::NameMap;

    fn resolver() -> IdentityResolver {
        IdentityResolver::new(["A", "B", "C"], |s: &str| s.to_lowercase())
    }

    #[test]
    fn test_remap_records_redirects() {
        let mut r = resolver();
        let outcome = r.remap([("a", "b"), ("b", "c")], false);
        assert_eq!(outcome.applied, 2);
        assert!(outcome.duplicates.is_none());
        assert!(outcome.is_consistent());
        assert_eq!(r.redirect_of("a").unwrap(), "b");
        assert_eq!(r.redirect_of("b").unwrap(), "c");
    }

    #[test]
    fn test_empty_batch_changes_nothing() {
        let mut r = resolver();
        r.remap([("a", "b")], false);
        let before = r.remapping_index();

        let outcome = r.remap(Vec::<(&str, &str)>::new(), false);

        assert_eq!(outcome, RemapOutcome::default());
        assert_eq!(r.remapping_index(), before);
    }

    #[test]
    fn test_last_duplicate_wins_and_warns() {
        let mut r = resolver();
        let outcome = r.remap([("a", "b"), ("a", "c"), ("a", "b"), ("b", "c")], false);

        assert_eq!(r.redirect_of("a").unwrap(), "b");
        assert_eq!(outcome.applied, 2);
        let warning = outcome.duplicates.unwrap();
        assert_eq!(warning.keys, ["a"]);
        assert!(warning.to_string().contains("a"));
    }

    #[test]
    fn test_overwrite_across_batches_is_allowed() {
        let mut r = resolver();
        r.remap([("a", "b")], false);
        let outcome = r.remap([("a", "c")], false);
        assert!(outcome.duplicates.is_none());
        assert_eq!(r.redirect_of("a").unwrap(), "c");
    }

    #[test]
    fn test_self_loop_is_dropped_silently() {
        let mut r = resolver();
        r.remap([("x", "y")], false);
        let outcome = r.remap([("x", "x")], false);
        assert!(outcome.is_consistent());
        assert!(r.redirect_of("x").is_none());
        assert_eq!(r.remap_len(), 0);
    }

    #[test]
    fn test_from_scratch_discards_previous_batches() {
        let mut r = resolver();
        r.remap([("a", "b")], false);
        r.remap([("c", "b")], true);
        let mut expected = NameMap::new();
        expected.insert("c".into(), "b".into());
        assert_eq!(r.remapping_index(), expected);
    }

    #[test]
    fn test_cycle_is_reported_not_rejected() {
        let mut r = resolver();
        let outcome = r.remap([("a", "b"), ("b", "a")], false);
        assert_eq!(r.remap_len(), 2);
        let report = outcome.inconsistencies.unwrap();
        assert!(report.contains("a"));
        assert!(report.contains("b"));
    }

    #[test]
    fn test_set_endpoint_returns_previous_target() {
        let mut r = resolver();
        r.remap([("a", "b"), ("b", "a")], false);

        assert_eq!(r.set_endpoint("b").unwrap(), "a");
        assert!(r.set_endpoint("b").is_none());
        assert!(r.inconsistencies().is_none());
        assert_eq!(r.resolve("a").unwrap(), "b");
    }
}
