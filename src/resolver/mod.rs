//! Name identity resolution.
//!
//! An [`IdentityResolver`] owns two mappings:
//!
//! ```text
//! primitive ──base map──▶ normalized ──remapping index──▶ … ──▶ endpoint
//! "Smyth, J."             "smyth,j"   "smyth,j" → "smith,j"     "smith,j"
//! ```
//!
//! The base map is derived from a [`Normalizer`]; the remapping index is
//! curated in batches ([`IdentityResolver::remap`]) and may chain. A chain
//! that loops back on itself is never resolved to a partial value: it fails
//! with [`ResolverError::CycleDetected`] and shows up in
//! [`IdentityResolver::inconsistencies`].

mod chain;
mod remap;
mod report;
pub mod shared;

pub use remap::{DuplicateKeyWarning, RemapOutcome};
pub use report::{CycleReport, InconsistencyReport};
pub use shared::SharedResolver;

use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::base::{Name, NameMap};
use crate::error::ResolverError;
use crate::normalize::{Normalizer, SharedNormalizer};

/// Maps primitive names to canonical identities.
#[derive(Clone, Default)]
pub struct IdentityResolver {
    /// Primitive → normalized. Entries are added or overwritten, never removed individually.
    base: NameMap,
    /// Normalized → normalized redirects. Never contains a self-loop.
    remapping: NameMap,
    normalizer: Option<SharedNormalizer>,
}

impl IdentityResolver {
    /// Build a resolver whose base map holds every name in `names`.
    pub fn new<I, S>(names: I, normalizer: impl Normalizer + 'static) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_shared_normalizer(names, Arc::new(normalizer))
    }

    /// Like [`IdentityResolver::new`], reusing an already shared normalizer.
    pub fn with_shared_normalizer<I, S>(names: I, normalizer: SharedNormalizer) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pending = dedup_names(names, |_| true);
        let base = normalize_batch(&pending, &*normalizer)
            .into_iter()
            .collect::<NameMap>();
        debug!(names = base.len(), "built base map");

        Self {
            base,
            remapping: NameMap::new(),
            normalizer: Some(normalizer),
        }
    }

    /// A resolver with no names yet.
    pub fn empty(normalizer: impl Normalizer + 'static) -> Self {
        Self {
            normalizer: Some(Arc::new(normalizer)),
            ..Self::default()
        }
    }

    /// Restore a resolver from previously built maps, without renormalizing.
    ///
    /// Without a normalizer, [`IdentityResolver::insert_names`] fails but
    /// remapping keeps working. Self-loops in `remapping` are dropped.
    pub fn from_maps(
        base: NameMap,
        remapping: NameMap,
        normalizer: Option<SharedNormalizer>,
    ) -> Self {
        let mut resolver = Self {
            base,
            remapping,
            normalizer,
        };
        resolver.drop_self_loops();
        resolver
    }

    /// Install or replace the normalizer used for future insertions.
    pub fn set_normalizer(&mut self, normalizer: impl Normalizer + 'static) {
        self.normalizer = Some(Arc::new(normalizer));
    }

    pub fn has_normalizer(&self) -> bool {
        self.normalizer.is_some()
    }

    // ============================================================
    // Base map
    // ============================================================

    /// Clear the base map and rebuild it from `names`.
    ///
    /// The remapping index is left untouched. Fails without changing
    /// anything when no normalizer is installed.
    pub fn rebuild_base_map<I, S>(&mut self, names: I) -> Result<usize, ResolverError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.normalizer.is_none() {
            return Err(ResolverError::missing_normalizer());
        }
        let dropped = self.base.len();
        self.base.clear();
        trace!(dropped, "cleared base map");
        self.insert_names(names, None, true)
    }

    /// Add primitive names to the base map.
    ///
    /// `normalizer` overrides the installed one for this call only. Unless
    /// `update_existing` is set, names already in the base map keep their
    /// current normalized value, even if `normalizer` would now produce a
    /// different one.
    ///
    /// Returns the number of entries written.
    pub fn insert_names<I, S>(
        &mut self,
        names: I,
        normalizer: Option<&dyn Normalizer>,
        update_existing: bool,
    ) -> Result<usize, ResolverError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let installed = self.normalizer.clone();
        let normalizer: &dyn Normalizer = match (normalizer, installed.as_deref()) {
            (Some(explicit), _) => explicit,
            (None, Some(installed)) => installed,
            (None, None) => return Err(ResolverError::missing_normalizer()),
        };

        let pending = dedup_names(names, |name| {
            update_existing || !self.base.contains_key(name.as_str())
        });
        let normalized = normalize_batch(&pending, normalizer);
        let written = normalized.len();
        self.base.extend(normalized);

        debug!(written, total = self.base.len(), "inserted names into base map");
        Ok(written)
    }

    // ============================================================
    // Read accessors (all return copies)
    // ============================================================

    /// Copy of the primitive → normalized map.
    pub fn base_map(&self) -> NameMap {
        self.base.clone()
    }

    /// Copy of the normalized → normalized remapping index.
    pub fn remapping_index(&self) -> NameMap {
        self.remapping.clone()
    }

    /// Number of primitive names.
    pub fn len(&self) -> usize {
        self.base.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    /// Number of redirects in the remapping index.
    pub fn remap_len(&self) -> usize {
        self.remapping.len()
    }

    pub fn contains_primitive(&self, primitive: &str) -> bool {
        self.base.contains_key(primitive)
    }

    /// Base (unresolved) normalization of a primitive.
    pub fn normalized_of(&self, primitive: &str) -> Option<Name> {
        self.base.get(primitive).cloned()
    }

    /// Direct redirect target of a normalized name, without following chains.
    pub fn redirect_of(&self, normalized: &str) -> Option<Name> {
        self.remapping.get(normalized).cloned()
    }

    fn drop_self_loops(&mut self) {
        self.remapping.retain(|source, target| {
            let keep = source != target;
            if !keep {
                trace!(name = %source, "dropped self-loop redirect");
            }
            keep
        });
    }
}

impl fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityResolver")
            .field("base", &self.base)
            .field("remapping", &self.remapping)
            .field("has_normalizer", &self.normalizer.is_some())
            .finish()
    }
}

/// Collect names once each, in first-appearance order, keeping those `keep` accepts.
fn dedup_names<I, S>(names: I, mut keep: impl FnMut(&Name) -> bool) -> Vec<Name>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = FxHashSet::default();
    names
        .into_iter()
        .map(|name| Name::new(name.as_ref()))
        .filter(|name| keep(name) && seen.insert(name.clone()))
        .collect()
}

/// Normalize in parallel; output order matches `names`.
fn normalize_batch(names: &[Name], normalizer: &dyn Normalizer) -> Vec<(Name, Name)> {
    names
        .par_iter()
        .map(|name| (name.clone(), Name::from(normalizer.normalize(name))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::DefaultNormalizer;

    fn lower(s: &str) -> String {
        s.to_lowercase()
    }

    #[test]
    fn test_base_map_applies_normalizer() {
        let resolver = IdentityResolver::new(["Smith, J.", "Smyth, J."], DefaultNormalizer::new());
        let base = resolver.base_map();
        assert_eq!(base.len(), 2);
        assert_eq!(base["Smith, J."], "smith,j");
        assert_eq!(base["Smyth, J."], "smyth,j");
    }

    #[test]
    fn test_base_map_keeps_first_appearance_order() {
        let resolver = IdentityResolver::new(["b", "a", "b", "c"], lower);
        let keys: Vec<_> = resolver.base_map().into_keys().collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn test_insert_names_leaves_existing_untouched() {
        let mut resolver = IdentityResolver::new(["Ana"], lower);
        let upper = |s: &str| s.to_uppercase();

        let written = resolver
            .insert_names(["Ana", "Bia"], Some(&upper), false)
            .unwrap();

        assert_eq!(written, 1);
        assert_eq!(resolver.normalized_of("Ana").unwrap(), "ana");
        assert_eq!(resolver.normalized_of("Bia").unwrap(), "BIA");
    }

    #[test]
    fn test_insert_names_update_existing_renormalizes() {
        let mut resolver = IdentityResolver::new(["Ana"], lower);
        let upper = |s: &str| s.to_uppercase();

        let written = resolver.insert_names(["Ana"], Some(&upper), true).unwrap();

        assert_eq!(written, 1);
        assert_eq!(resolver.normalized_of("Ana").unwrap(), "ANA");
    }

    #[test]
    fn test_insert_without_normalizer_is_configuration_error() {
        let mut resolver = IdentityResolver::from_maps(NameMap::new(), NameMap::new(), None);
        let err = resolver.insert_names(["x"], None, false).unwrap_err();
        assert!(matches!(err, ResolverError::Configuration(_)));
        assert!(resolver.is_empty());
    }

    #[test]
    fn test_rebuild_keeps_remapping_index() {
        let mut resolver = IdentityResolver::new(["A", "B"], lower);
        resolver.remap([("a", "b")], false);

        resolver.rebuild_base_map(["C"]).unwrap();

        assert_eq!(resolver.len(), 1);
        assert!(resolver.contains_primitive("C"));
        assert!(!resolver.contains_primitive("A"));
        assert_eq!(resolver.redirect_of("a").unwrap(), "b");
    }

    #[test]
    fn test_rebuild_without_normalizer_changes_nothing() {
        let mut base = NameMap::new();
        base.insert("A".into(), "a".into());
        let mut resolver = IdentityResolver::from_maps(base, NameMap::new(), None);

        assert!(resolver.rebuild_base_map(["B"]).is_err());
        assert!(resolver.contains_primitive("A"));
    }

    #[test]
    fn test_from_maps_drops_self_loops() {
        let mut remapping = NameMap::new();
        remapping.insert("x".into(), "x".into());
        remapping.insert("y".into(), "z".into());
        let resolver = IdentityResolver::from_maps(NameMap::new(), remapping, None);
        assert_eq!(resolver.remap_len(), 1);
        assert!(resolver.redirect_of("x").is_none());
    }

    #[test]
    fn test_accessors_return_copies() {
        let resolver = IdentityResolver::new(["A"], lower);
        let mut base = resolver.base_map();
        base.insert("A".into(), "tampered".into());
        assert_eq!(resolver.normalized_of("A").unwrap(), "a");
    }

    #[test]
    fn test_set_normalizer_enables_insertion() {
        let mut resolver = IdentityResolver::from_maps(NameMap::new(), NameMap::new(), None);
        assert!(!resolver.has_normalizer());
        resolver.set_normalizer(lower);
        resolver.insert_names(["Q"], None, false).unwrap();
        assert_eq!(resolver.normalized_of("Q").unwrap(), "q");
    }
}
