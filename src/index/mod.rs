//! Record indexes keyed by name identity.
//!
//! Given atomized rows (one list of primitive names per specimen record),
//! collect the rows each identity appears in. This is a read-only consumer
//! of the resolved view: the resolver is never modified.

use indexmap::IndexMap;

use crate::base::{Name, NameMap};
use crate::error::ResolverError;
use crate::resolver::IdentityResolver;

/// Identity → row positions, one entry per occurrence, ascending.
pub type NamesIndex = IndexMap<Name, Vec<usize>>;

/// Index `rows` by name.
///
/// With a `view` (primitive → identity), every identity in the view gets a
/// key, possibly with no rows, and names missing from the view are skipped.
/// Without one, every raw name is its own key.
pub fn names_indexes<R, S>(rows: &[R], view: Option<&NameMap>) -> NamesIndex
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut index = NamesIndex::new();
    if let Some(view) = view {
        for identity in view.values() {
            index.entry(identity.clone()).or_default();
        }
    }

    for (position, row) in rows.iter().enumerate() {
        for name in row.as_ref() {
            let name = name.as_ref();
            let key = match view {
                Some(view) => match view.get(name) {
                    Some(identity) => identity.clone(),
                    None => continue,
                },
                None => Name::new(name),
            };
            index.entry(key).or_default().push(position);
        }
    }
    index
}

impl IdentityResolver {
    /// Index `rows` by resolved identity. Fails if the remapping index has a cycle.
    pub fn index_rows<R, S>(&self, rows: &[R]) -> Result<NamesIndex, ResolverError>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let view = self.resolved_view(true)?;
        Ok(names_indexes(rows, Some(&view)))
    }
}
