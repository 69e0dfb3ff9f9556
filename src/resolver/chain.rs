//! Chain resolution through the remapping index.

use std::collections::BTreeSet;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace, warn};

use super::report::{CycleReport, InconsistencyReport};
use super::IdentityResolver;
use crate::base::{Name, NameMap};
use crate::error::{ResolverError, format_chain};

impl IdentityResolver {
    /// Follow redirects from `name` until reaching an endpoint.
    ///
    /// A name with no redirect resolves to itself. Revisiting a name on the
    /// current chain fails with [`ResolverError::CycleDetected`].
    pub fn resolve(&self, name: &str) -> Result<Name, ResolverError> {
        let mut chain = self.resolution_chain(name)?;
        Ok(chain.pop().unwrap_or_else(|| Name::new(name)))
    }

    /// Every name visited while resolving `name`, from `name` to its endpoint.
    ///
    /// A chain of `k` redirects has `k + 1` entries.
    pub fn resolution_chain(&self, name: &str) -> Result<Vec<Name>, ResolverError> {
        self.walk(name).map_err(|chain| {
            warn!(start = name, chain = %format_chain(&chain), "remapping cycle");
            ResolverError::cycle(name, chain)
        })
    }

    /// Primitive → identity for every base map entry.
    ///
    /// With `remap`, each normalized name is resolved through the remapping
    /// index and the first cycle aborts the whole view. Without it, this is a
    /// copy of the base map.
    pub fn resolved_view(&self, remap: bool) -> Result<NameMap, ResolverError> {
        if !remap {
            return Ok(self.base.clone());
        }

        let mut resolved: FxHashMap<&Name, Name> = FxHashMap::default();
        let mut view = NameMap::with_capacity(self.base.len());
        for (primitive, normalized) in &self.base {
            let identity = match resolved.get(normalized) {
                Some(identity) => identity.clone(),
                None => {
                    let identity = self.resolve(normalized)?;
                    resolved.insert(normalized, identity.clone());
                    identity
                }
            };
            view.insert(primitive.clone(), identity);
        }
        Ok(view)
    }

    /// Scan every redirect source and report all cycles.
    ///
    /// Returns `None` when every chain reaches an endpoint.
    pub fn inconsistencies(&self) -> Option<InconsistencyReport> {
        let cycles: Vec<CycleReport> = self
            .remapping
            .keys()
            .filter_map(|key| {
                self.walk(key).err().map(|chain| CycleReport {
                    start: key.clone(),
                    chain,
                })
            })
            .collect();

        if cycles.is_empty() {
            return None;
        }
        warn!(cycles = cycles.len(), "remapping index has cycles");
        Some(InconsistencyReport { cycles })
    }

    /// Redirect sources that are also redirect targets, in index order.
    ///
    /// These are multi-hop chains. They resolve fine; [`IdentityResolver::flatten`]
    /// collapses them.
    pub fn chained_keys(&self) -> Vec<Name> {
        let targets: FxHashSet<&Name> = self.remapping.values().collect();
        self.remapping
            .keys()
            .filter(|key| targets.contains(key))
            .cloned()
            .collect()
    }

    /// Distinct identities, sorted.
    pub fn normalized_identities(&self, remap: bool) -> Result<BTreeSet<Name>, ResolverError> {
        Ok(self.resolved_view(remap)?.into_values().collect())
    }

    /// Every primitive whose identity is `identity`, in base map order.
    ///
    /// Empty when nothing maps there.
    pub fn primitives_for(&self, identity: &str, remap: bool) -> Result<Vec<Name>, ResolverError> {
        Ok(self
            .resolved_view(remap)?
            .into_iter()
            .filter(|(_, resolved)| resolved.as_str() == identity)
            .map(|(primitive, _)| primitive)
            .collect())
    }

    /// Point every primitive straight at its identity and empty the remapping index.
    ///
    /// One-way: the individual redirects are gone afterwards. Fails, leaving
    /// the resolver untouched, if the index has a cycle.
    pub fn flatten(&mut self) -> Result<(), ResolverError> {
        self.base = self.resolved_view(true)?;
        let collapsed = std::mem::take(&mut self.remapping).len();
        debug!(collapsed, "flattened remapping index into base map");
        Ok(())
    }

    /// Walk redirects from `name`. `Err` carries the chain up to and including
    /// the first repeated name.
    fn walk(&self, name: &str) -> Result<Vec<Name>, Vec<Name>> {
        let mut current = Name::new(name);
        let mut visited = FxHashSet::default();
        visited.insert(current.clone());
        let mut chain = vec![current.clone()];

        while let Some(next) = self.remapping.get(current.as_str()) {
            chain.push(next.clone());
            if !visited.insert(next.clone()) {
                return Err(chain);
            }
            trace!(from = %current, to = %next, "remap hop");
            current = next.clone();
        }
        Ok(chain)
    }
}
