//! Profile composition: stack profile layers over the built-in defaults and
//! deserialize the result into a typed [`Configuration`].

use std::path::Path;

use crate::config::defaults::default_document;
use crate::config::document::{load_consolidated, load_profile_document};
use crate::config::merge::merge_document;
use crate::config::{ConfigError, Configuration};
use crate::util::Shell;

/// The implicit base profile every composition starts from.
pub const COMMON_PROFILE: &str = "common";

/// Compose the named profiles into a single configuration.
///
/// `common` is always the first layer; requesting it explicitly in a position
/// other than first, or naming any profile twice, is rejected. Later layers
/// override earlier ones, so the order of `names` is significant.
pub fn compose(names: &[String], root: &Path, shell: &Shell) -> Result<Configuration, ConfigError> {
    let mut layers: Vec<String> = Vec::with_capacity(names.len() + 1);
    if names.first().map(String::as_str) != Some(COMMON_PROFILE) {
        layers.push(COMMON_PROFILE.to_string());
    }
    for name in names {
        if layers.iter().any(|seen| seen == name) {
            return Err(ConfigError::DuplicateProfile { name: name.clone() });
        }
        layers.push(name.clone());
    }

    let consolidated = load_consolidated(root)?;
    let defaults = default_document();
    let mut composite = defaults.clone();

    for name in &layers {
        let document = match load_profile_document(root, name, consolidated.as_ref()) {
            Ok(document) => document,
            // A missing common layer just means the project has no shared
            // baseline; every other profile must exist.
            Err(ConfigError::MissingProfile { .. }) if name == COMMON_PROFILE => continue,
            Err(err) => return Err(err),
        };
        // An empty profile file parses as null; there is nothing to merge.
        if document.is_null() {
            continue;
        }
        shell.status(
            crate::util::Status::Composing,
            format!("profile `{name}`"),
        );
        merge_document(&mut composite, document, &defaults, name, shell);
    }

    let mut config: Configuration =
        serde_yaml::from_value(composite).map_err(|source| ConfigError::Invalid {
            profiles: layers.clone(),
            source,
        })?;
    config.profiles = layers;

    if semver::Version::parse(&config.manifest.version).is_err() {
        shell.warn(format!(
            "manifest version `{}` is not valid semver",
            config.manifest.version
        ));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::document::save_profile_document;
    use crate::config::Generator;
    use tempfile::TempDir;

    fn write_profile(root: &Path, name: &str, yaml: &str) {
        let doc = serde_yaml::from_str(yaml).unwrap();
        save_profile_document(root, name, &doc).unwrap();
    }

    #[test]
    fn test_compose_defaults_only() {
        let dir = TempDir::new().unwrap();
        let shell = Shell::silent();
        let config = compose(&[], dir.path(), &shell).unwrap();
        assert_eq!(config.manifest.name, "untitled");
        assert_eq!(config.meta.generator, Generator::Ninja);
        assert_eq!(config.profiles, vec!["common"]);
    }

    #[test]
    fn test_compose_layers_in_order() {
        let dir = TempDir::new().unwrap();
        write_profile(dir.path(), "common", "manifest: { name: widget }");
        write_profile(
            dir.path(),
            "release",
            "manifest: { tooling: { CXXFLAGS: \"-O2\" } }",
        );

        let shell = Shell::silent();
        let config = compose(&["release".to_string()], dir.path(), &shell).unwrap();
        assert_eq!(config.manifest.name, "widget");
        assert_eq!(config.manifest.tooling.cxxflags, "-O2");
        assert_eq!(config.profiles, vec!["common", "release"]);
    }

    #[test]
    fn test_missing_profile_is_an_error() {
        let dir = TempDir::new().unwrap();
        let shell = Shell::silent();
        let err = compose(&["nope".to_string()], dir.path(), &shell).unwrap_err();
        assert!(matches!(err, ConfigError::MissingProfile { name, .. } if name == "nope"));
    }

    #[test]
    fn test_duplicate_profile_is_rejected() {
        let dir = TempDir::new().unwrap();
        write_profile(dir.path(), "release", "{}");
        let shell = Shell::silent();
        let names = vec!["release".to_string(), "release".to_string()];
        let err = compose(&names, dir.path(), &shell).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateProfile { name } if name == "release"));
    }

    #[test]
    fn test_explicit_common_first_is_allowed() {
        let dir = TempDir::new().unwrap();
        write_profile(dir.path(), "common", "manifest: { name: widget }");
        let shell = Shell::silent();
        let names = vec!["common".to_string()];
        let config = compose(&names, dir.path(), &shell).unwrap();
        assert_eq!(config.profiles, vec!["common"]);
    }

    #[test]
    fn test_explicit_common_after_another_profile_is_duplicate() {
        let dir = TempDir::new().unwrap();
        write_profile(dir.path(), "release", "{}");
        let shell = Shell::silent();
        let names = vec!["release".to_string(), "common".to_string()];
        let err = compose(&names, dir.path(), &shell).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateProfile { name } if name == "common"));
    }

    #[test]
    fn test_dependencies_and_features_deserialize() {
        let dir = TempDir::new().unwrap();
        write_profile(
            dir.path(),
            "common",
            r#"
dependencies:
  - name: zlib
    source: system
features:
  - logging
  - tracing: true
"#,
        );
        let shell = Shell::silent();
        let config = compose(&[], dir.path(), &shell).unwrap();
        assert_eq!(config.dependencies.len(), 1);
        assert_eq!(config.dependencies[0].name, "zlib");
        let decls = config.feature_decls();
        assert_eq!(decls[0], ("logging".to_string(), false));
        assert_eq!(decls[1], ("tracing".to_string(), true));
    }
}
