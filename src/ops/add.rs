//! Implementation of `catalyst add` - the only operation that edits a
//! profile document.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_yaml::{Mapping, Value};

use crate::config::{
    load_consolidated, load_profile_document, save_profile_document, ConfigError,
    DependencyRecord, COMMON_PROFILE,
};
use crate::util::{Shell, Status};

#[derive(Debug, Clone)]
pub struct AddOptions {
    /// The record to insert.
    pub record: DependencyRecord,

    /// Profile document to edit.
    pub profile: String,
}

impl AddOptions {
    pub fn new(record: DependencyRecord) -> Self {
        AddOptions {
            record,
            profile: COMMON_PROFILE.to_string(),
        }
    }
}

/// Append a dependency record to one profile document and persist it.
///
/// Uniqueness is checked only within the edited profile; the same name may
/// appear in other layers.
pub fn add(root: &Path, opts: &AddOptions, shell: &Shell) -> Result<()> {
    let consolidated = load_consolidated(root)?;
    let mut document = match load_profile_document(root, &opts.profile, consolidated.as_ref()) {
        Ok(Value::Mapping(map)) => map,
        Ok(Value::Null) => Mapping::new(),
        Ok(_) => bail!("profile `{}` is not a mapping", opts.profile),
        // Adding to a profile that does not exist yet starts a fresh one.
        Err(ConfigError::MissingProfile { .. }) => Mapping::new(),
        Err(err) => return Err(err.into()),
    };

    let dependencies = document
        .entry(Value::String("dependencies".to_string()))
        .or_insert_with(|| Value::Sequence(Vec::new()));
    let Value::Sequence(dependencies) = dependencies else {
        bail!(
            "`dependencies` in profile `{}` is not a sequence",
            opts.profile
        );
    };

    let name = &opts.record.name;
    let exists = dependencies.iter().any(|entry| {
        entry
            .get("name")
            .and_then(Value::as_str)
            .is_some_and(|existing| existing == name)
    });
    if exists {
        bail!(
            "dependency `{name}` already declared in profile `{}`",
            opts.profile
        );
    }

    let entry = serde_yaml::to_value(&opts.record)
        .context("failed to serialize dependency record")?;
    dependencies.push(entry);

    save_profile_document(root, &opts.profile, &Value::Mapping(document))?;
    shell.status(
        Status::Created,
        format!("dependency `{name}` in profile `{}`", opts.profile),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{compose, SourceKind};
    use tempfile::TempDir;

    fn system_dep(name: &str) -> DependencyRecord {
        DependencyRecord::new(name, SourceKind::System)
    }

    #[test]
    fn test_add_creates_profile_and_round_trips() {
        let tmp = TempDir::new().unwrap();
        let shell = Shell::silent();
        add(tmp.path(), &AddOptions::new(system_dep("zlib")), &shell).unwrap();

        let config = compose(&[], tmp.path(), &shell).unwrap();
        assert_eq!(config.dependencies.len(), 1);
        assert_eq!(config.dependencies[0].name, "zlib");
        assert_eq!(config.dependencies[0].source, SourceKind::System);
    }

    #[test]
    fn test_duplicate_within_profile_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let shell = Shell::silent();
        add(tmp.path(), &AddOptions::new(system_dep("zlib")), &shell).unwrap();
        let err = add(tmp.path(), &AddOptions::new(system_dep("zlib")), &shell).unwrap_err();
        assert!(err.to_string().contains("already declared"));
    }

    #[test]
    fn test_same_name_in_another_profile_is_allowed() {
        let tmp = TempDir::new().unwrap();
        let shell = Shell::silent();
        add(tmp.path(), &AddOptions::new(system_dep("zlib")), &shell).unwrap();

        let mut opts = AddOptions::new(system_dep("zlib"));
        opts.profile = "release".to_string();
        add(tmp.path(), &opts, &shell).unwrap();

        let config = compose(&["release".to_string()], tmp.path(), &shell).unwrap();
        assert_eq!(config.dependencies.len(), 2);
    }

    #[test]
    fn test_add_preserves_other_document_content() {
        let tmp = TempDir::new().unwrap();
        let shell = Shell::silent();
        save_profile_document(
            tmp.path(),
            "common",
            &serde_yaml::from_str("manifest: { name: keepme }").unwrap(),
        )
        .unwrap();

        add(tmp.path(), &AddOptions::new(system_dep("zlib")), &shell).unwrap();
        let config = compose(&[], tmp.path(), &shell).unwrap();
        assert_eq!(config.manifest.name, "keepme");
        assert_eq!(config.dependencies.len(), 1);
    }
}
