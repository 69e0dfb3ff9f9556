//! Crate-wide constants.

/// Delimiter used by the atomizer when none is configured.
pub const DEFAULT_DELIMITER: &str = ";";

/// Record field holding the primitive → normalized map.
pub const FIELD_BASE_MAP: &str = "_map_prim_norm";

/// Record field holding the normalized → normalized remapping index.
pub const FIELD_REMAPPING_INDEX: &str = "_remappingIndex";

/// Base map field name written by earlier revisions.
pub const LEGACY_FIELD_BASE_MAP: &str = "_map";

/// Remapping field name written by earlier revisions.
pub const LEGACY_FIELD_REMAPPING_INDEX: &str = "_remappingDict";

/// File name used when a names map is saved without an explicit path.
pub const DEFAULT_RECORD_FILE: &str = "names_map.json";
