//! Release metadata files.
//!
//! The metadata file is YAML with a top-level `annotations` mapping:
//!
//! ```yaml
//! annotations:
//!   operators.operatorframework.io.bundle.package.v1: acme-operator
//!   com.redhat.openshift.versions: "v4.12-v4.16"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Default, serde::Deserialize)]
struct MetadataFile {
    #[serde(default)]
    annotations: Option<BTreeMap<String, serde_yaml::Value>>,
}

/// Reads the scalar annotations of a metadata file.
///
/// Strings, numbers, and booleans are kept as text; nested values are
/// dropped. A file without an `annotations` key yields an empty map.
///
/// # Errors
///
/// Returns a human-readable message when the file cannot be read or is not
/// valid YAML. Callers record it on the release instead of failing.
pub fn read_annotations(path: &Path) -> Result<BTreeMap<String, String>, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    parse_annotations(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

/// Parses metadata YAML content. See [`read_annotations`].
pub fn parse_annotations(content: &str) -> Result<BTreeMap<String, String>, serde_yaml::Error> {
    // An empty document deserializes to unit, not to the struct.
    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    let file: Option<MetadataFile> = serde_yaml::from_str(content)?;
    let annotations = file.and_then(|f| f.annotations).unwrap_or_default();

    Ok(annotations
        .into_iter()
        .filter_map(|(key, value)| scalar_text(&value).map(|text| (key, text)))
        .collect())
}

fn scalar_text(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
