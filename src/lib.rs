//! # nomen-base
//!
//! Identity resolution for free-text collector and author names extracted
//! from biological specimen records.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! atomize, index → Consumers: split raw fields, index records by identity
//!   ↓
//! interchange    → Persisted names map records (JSON)
//!   ↓
//! resolver       → IdentityResolver: base map, remapping index, cycle reports
//!   ↓
//! normalize      → Pluggable Normalizer, default collector-name heuristic
//!   ↓
//! base           → Primitives (Name, NameMap, constants)
//! ```
//!
//! ## Example
//!
//! ```
//! use nomen::{DefaultNormalizer, IdentityResolver};
//!
//! let mut resolver = IdentityResolver::new(
//!     ["Smith, J.", "smith,j", "Smyth, J."],
//!     DefaultNormalizer::new(),
//! );
//! let outcome = resolver.remap([("smyth,j", "smith,j")], false);
//! assert!(outcome.is_consistent());
//!
//! let view = resolver.resolved_view(true).unwrap();
//! assert!(view.values().all(|identity| identity == "smith,j"));
//! ```

// ============================================================================
// MODULES (dependency order: base → normalize → resolver → interchange → consumers)
// ============================================================================

/// Foundation types: Name, NameMap, constants
pub mod base;

/// Error taxonomy
pub mod error;

/// Normalization capability and the default heuristic
pub mod normalize;

/// Identity resolution: base map, remapping index, chain resolution
pub mod resolver;

/// Persisted names map records
pub mod interchange;

/// Splitting raw names fields into names
pub mod atomize;

/// Record indexes keyed by identity
pub mod index;

// Re-export the everyday API
pub use base::{Name, NameMap};
pub use error::ResolverError;
pub use interchange::NamesMapRecord;
pub use normalize::{DefaultNormalizer, NormalizationForm, Normalizer, SharedNormalizer};
pub use resolver::{
    CycleReport, DuplicateKeyWarning, IdentityResolver, InconsistencyReport, RemapOutcome,
    SharedResolver,
};
