//! Persisted names maps.
//!
//! A resolver is stored as a single JSON record:
//!
//! ```text
//! {
//!     "_map_prim_norm":  { "<primitive>":  "<normalized>", ... },
//!     "_remappingIndex": { "<normalized>": "<normalized>", ... }
//! }
//! ```
//!
//! Keys are written sorted, with four-space indentation and without
//! escaping non-ASCII characters. Records written by earlier revisions
//! (`_map` / `_remappingDict`, the latter possibly `null`) load unchanged.
//!
//! ## Usage
//!
//! ```ignore
//! use nomen::{DefaultNormalizer, IdentityResolver};
//!
//! let mut resolver = IdentityResolver::new(names, DefaultNormalizer::new());
//! resolver.remap([("smyth,j", "smith,j")], false);
//! resolver.write_to_file("names_map.json", false)?;
//!
//! let restored = IdentityResolver::read_from_file("names_map.json", None)?;
//! ```

mod record;

pub use record::NamesMapRecord;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::base::constants::DEFAULT_RECORD_FILE;
use crate::base::{Name, NameMap};
use crate::error::ResolverError;
use crate::normalize::SharedNormalizer;
use crate::resolver::{IdentityResolver, RemapOutcome};

/// Where a names map lands when saved into `dir` without an explicit file name.
pub fn default_record_path(dir: impl AsRef<Path>) -> PathBuf {
    dir.as_ref().join(DEFAULT_RECORD_FILE)
}

impl IdentityResolver {
    /// Capture the current state as a record.
    ///
    /// With `flatten`, every primitive is stored pointing at its resolved
    /// identity and the stored remapping index is empty; a cyclic index makes
    /// this fail. The resolver itself is not modified.
    pub fn to_record(&self, flatten: bool) -> Result<NamesMapRecord, ResolverError> {
        if flatten {
            return Ok(NamesMapRecord::from_maps(
                self.resolved_view(true)?,
                NameMap::new(),
            ));
        }
        Ok(NamesMapRecord::from_maps(self.base_map(), self.remapping_index()))
    }

    /// Restore a resolver from a record, verbatim.
    ///
    /// Nothing is renormalized, so `normalizer` may be `None`; it is only
    /// needed to insert more names later.
    pub fn from_record(record: NamesMapRecord, normalizer: Option<SharedNormalizer>) -> Self {
        let (base, remapping) = record.into_maps();
        Self::from_maps(base, remapping, normalizer)
    }

    /// Read a resolver from a JSON file.
    pub fn read_from_file(
        path: impl AsRef<Path>,
        normalizer: Option<SharedNormalizer>,
    ) -> Result<Self, ResolverError> {
        let record = NamesMapRecord::read_from_file(path)?;
        Ok(Self::from_record(record, normalizer))
    }

    /// Write the resolver to a JSON file. See [`IdentityResolver::to_record`].
    pub fn write_to_file(&self, path: impl AsRef<Path>, flatten: bool) -> Result<(), ResolverError> {
        self.to_record(flatten)?.write_to_file(path)
    }

    /// Apply the remapping index stored in a record file as one remap batch.
    pub fn remap_from_file(
        &mut self,
        path: impl AsRef<Path>,
        from_scratch: bool,
    ) -> Result<RemapOutcome, ResolverError> {
        let path = path.as_ref();
        let record = NamesMapRecord::read_from_file(path)?;
        debug!(path = %path.display(), redirects = record.remapping.len(), "loaded remap batch");
        let pairs: Vec<(Name, Name)> = record.remapping.into_iter().collect();
        Ok(self.remap(pairs, from_scratch))
    }
}
