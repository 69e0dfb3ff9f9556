//! Foundation types for nomen.
//!
//! This module provides the types shared by every other module:
//! - [`Name`] - Cheap-to-clone name string (primitive or normalized)
//! - [`NameMap`] - Insertion-ordered name → name mapping
//! - Crate constants (default delimiter, record field names)
//!
//! This module has NO dependencies on other nomen modules.

pub mod constants;

use indexmap::IndexMap;

/// A name string. Primitive and normalized names share this representation.
///
/// Short names (the overwhelming majority of collector names) are stored
/// inline, and clones never allocate.
pub type Name = smol_str::SmolStr;

/// Name → name mapping that preserves insertion order.
pub type NameMap = IndexMap<Name, Name>;
