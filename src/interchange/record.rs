//! The on-disk names map record.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use crate::base::{Name, NameMap};
use crate::error::ResolverError;

/// Base map and remapping index as stored on disk.
///
/// Maps are ordered by key so a saved file diffs cleanly between curation
/// sessions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamesMapRecord {
    /// Primitive → normalized.
    #[serde(rename = "_map_prim_norm", alias = "_map")]
    pub base: BTreeMap<Name, Name>,

    /// Normalized → normalized redirects.
    #[serde(
        rename = "_remappingIndex",
        alias = "_remappingDict",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub remapping: BTreeMap<Name, Name>,
}

impl NamesMapRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_maps(base: NameMap, remapping: NameMap) -> Self {
        Self {
            base: base.into_iter().collect(),
            remapping: remapping.into_iter().collect(),
        }
    }

    pub(crate) fn into_maps(self) -> (NameMap, NameMap) {
        (
            self.base.into_iter().collect(),
            self.remapping.into_iter().collect(),
        )
    }

    /// Parse a record from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ResolverError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render the record as indented JSON.
    pub fn to_json(&self) -> Result<String, ResolverError> {
        let mut out = Vec::new();
        self.write_json(&mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Read a record from a JSON file.
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, ResolverError> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let record: Self = serde_json::from_reader(reader)?;
        debug!(
            path = %path.display(),
            names = record.base.len(),
            redirects = record.remapping.len(),
            "read names map record"
        );
        Ok(record)
    }

    /// Write the record to a JSON file, replacing any existing content.
    ///
    /// The buffered writer is flushed before returning so write errors
    /// surface here instead of being lost on drop.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), ResolverError> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_json(&mut writer)?;
        writer.flush()?;
        debug!(
            path = %path.display(),
            names = self.base.len(),
            redirects = self.remapping.len(),
            "wrote names map record"
        );
        Ok(())
    }

    fn write_json<W: Write>(&self, writer: W) -> Result<(), ResolverError> {
        let mut serializer =
            serde_json::Serializer::with_formatter(writer, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut serializer)?;
        Ok(())
    }
}

/// Records from earlier revisions store a never-curated index as `null`.
fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<Name, Name>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeMap<Name, Name>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::constants::{
        FIELD_BASE_MAP, FIELD_REMAPPING_INDEX, LEGACY_FIELD_BASE_MAP,
        LEGACY_FIELD_REMAPPING_INDEX,
    };

    fn sample() -> NamesMapRecord {
        let mut record = NamesMapRecord::new();
        record.base.insert("Smyth, J.".into(), "smyth,j".into());
        record.base.insert("Smith, J.".into(), "smith,j".into());
        record.remapping.insert("smyth,j".into(), "smith,j".into());
        record
    }

    #[test]
    fn test_json_uses_current_field_names() {
        let json = sample().to_json().unwrap();
        assert!(json.contains(&format!("\"{FIELD_BASE_MAP}\"")));
        assert!(json.contains(&format!("\"{FIELD_REMAPPING_INDEX}\"")));
        assert!(json.contains("\n        \"Smith, J.\": \"smith,j\""));
    }

    #[test]
    fn test_json_keys_sorted() {
        let json = sample().to_json().unwrap();
        let smith = json.find("Smith, J.").unwrap();
        let smyth = json.find("Smyth, J.").unwrap();
        assert!(smith < smyth);
    }

    #[test]
    fn test_json_round_trip() {
        let record = sample();
        let parsed = NamesMapRecord::from_json(&record.to_json().unwrap()).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_non_ascii_is_not_escaped() {
        let mut record = NamesMapRecord::new();
        record.base.insert("Gonçalves".into(), "goncalves".into());
        assert!(record.to_json().unwrap().contains("Gonçalves"));
    }

    #[test]
    fn test_legacy_field_names_load() {
        let json = format!(
            r#"{{ "{LEGACY_FIELD_BASE_MAP}": {{ "A": "a" }}, "{LEGACY_FIELD_REMAPPING_INDEX}": {{ "a": "b" }} }}"#
        );
        let record = NamesMapRecord::from_json(&json).unwrap();
        assert_eq!(record.base["A"], "a");
        assert_eq!(record.remapping["a"], "b");
    }

    #[test]
    fn test_null_or_missing_remapping_is_empty() {
        let with_null = NamesMapRecord::from_json(r#"{ "_map": { "A": "a" }, "_remappingDict": null }"#)
            .unwrap();
        assert!(with_null.remapping.is_empty());

        let missing = NamesMapRecord::from_json(r#"{ "_map_prim_norm": {} }"#).unwrap();
        assert!(missing.remapping.is_empty());
    }

    #[test]
    fn test_missing_base_map_is_an_error() {
        let err = NamesMapRecord::from_json(r#"{ "_remappingIndex": {} }"#).unwrap_err();
        assert!(matches!(err, ResolverError::Json(_)));
    }
}
