//! Locating and persisting profile documents.
//!
//! Profiles live either in the consolidated `catalyst.yaml` (a top-level
//! mapping of profile name to document) or in per-profile
//! `catalyst.<name>.yaml` files. The consolidated document wins when both
//! exist.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use super::ConfigError;

/// Consolidated multi-profile document filename.
pub const CONSOLIDATED_FILE: &str = "catalyst.yaml";

/// Path of the consolidated document under `root`.
pub fn consolidated_path(root: &Path) -> PathBuf {
    root.join(CONSOLIDATED_FILE)
}

/// Path of the per-profile file convention for `name` under `root`.
pub fn profile_path(root: &Path, name: &str) -> PathBuf {
    root.join(format!("catalyst.{name}.yaml"))
}

fn read_yaml(path: &Path) -> Result<Value, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the consolidated document if present.
pub fn load_consolidated(root: &Path) -> Result<Option<Mapping>, ConfigError> {
    let path = consolidated_path(root);
    if !path.exists() {
        return Ok(None);
    }
    match read_yaml(&path)? {
        Value::Mapping(map) => Ok(Some(map)),
        _ => Err(ConfigError::BadConsolidated { path }),
    }
}

/// Load the document backing profile `name`.
///
/// Lookup order: consolidated entry, then the per-profile file. Absence from
/// both is fatal to composition.
pub fn load_profile_document(
    root: &Path,
    name: &str,
    consolidated: Option<&Mapping>,
) -> Result<Value, ConfigError> {
    if let Some(map) = consolidated {
        if let Some(doc) = map.get(Value::String(name.to_string())) {
            return Ok(doc.clone());
        }
    }

    let path = profile_path(root, name);
    if path.exists() {
        return read_yaml(&path);
    }

    Err(ConfigError::MissingProfile {
        name: name.to_string(),
        root: root.to_path_buf(),
    })
}

/// Persist an edited profile document back to where it came from.
///
/// Updates the consolidated entry when the profile lives there, otherwise
/// writes the per-profile file.
pub fn save_profile_document(root: &Path, name: &str, doc: &Value) -> Result<(), ConfigError> {
    if let Some(mut map) = load_consolidated(root)? {
        let key = Value::String(name.to_string());
        if map.contains_key(&key) {
            map.insert(key, doc.clone());
            let path = consolidated_path(root);
            let rendered = serde_yaml::to_string(&Value::Mapping(map))
                .expect("profile mapping serializes");
            return fs::write(&path, rendered).map_err(|source| ConfigError::Io { path, source });
        }
    }

    let path = profile_path(root, name);
    let rendered = serde_yaml::to_string(doc).expect("profile document serializes");
    fs::write(&path, rendered).map_err(|source| ConfigError::Io { path, source })
}
