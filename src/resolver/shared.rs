//! A resolver shared between threads.
//!
//! Curation batches must never interleave with reads: a reader walking a
//! chain while a batch is half applied could miss or invent a cycle. The
//! whole resolver therefore sits behind one `RwLock`; every mutation takes
//! the write lock, every query the read lock.

use std::sync::Arc;

use parking_lot::RwLock;

use super::{IdentityResolver, RemapOutcome};
use crate::base::{Name, NameMap};
use crate::error::ResolverError;

/// Cheaply clonable handle to a single [`IdentityResolver`].
#[derive(Clone, Debug, Default)]
pub struct SharedResolver {
    inner: Arc<RwLock<IdentityResolver>>,
}

impl SharedResolver {
    pub fn new(resolver: IdentityResolver) -> Self {
        Self {
            inner: Arc::new(RwLock::new(resolver)),
        }
    }

    /// Run `f` with shared read access.
    pub fn read<R>(&self, f: impl FnOnce(&IdentityResolver) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` with exclusive write access.
    pub fn write<R>(&self, f: impl FnOnce(&mut IdentityResolver) -> R) -> R {
        f(&mut self.inner.write())
    }

    pub fn remap<I, K, V>(&self, pairs: I, from_scratch: bool) -> RemapOutcome
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.write(|resolver| resolver.remap(pairs, from_scratch))
    }

    pub fn set_endpoint(&self, key: &str) -> Option<Name> {
        self.write(|resolver| resolver.set_endpoint(key))
    }

    pub fn resolve(&self, name: &str) -> Result<Name, ResolverError> {
        self.read(|resolver| resolver.resolve(name))
    }

    pub fn resolved_view(&self, remap: bool) -> Result<NameMap, ResolverError> {
        self.read(|resolver| resolver.resolved_view(remap))
    }

    /// Independent copy of the current state.
    pub fn snapshot(&self) -> IdentityResolver {
        self.read(IdentityResolver::clone)
    }

    /// Take the resolver back if this is the last handle.
    pub fn into_inner(self) -> Result<IdentityResolver, Self> {
        Arc::try_unwrap(self.inner)
            .map(RwLock::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl From<IdentityResolver> for SharedResolver {
    fn from(resolver: IdentityResolver) -> Self {
        Self::new(resolver)
    }
}
