//! Workspace - sibling-project registry.
//!
//! A workspace groups related projects under one root so a dependency whose
//! name matches a member is taken from the sibling checkout instead of being
//! fetched. The registry lives in `catalyst-workspace.yaml` and is discovered
//! by walking upward from the project directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// File name of the workspace registry document.
pub const WORKSPACE_FILE: &str = "catalyst-workspace.yaml";

/// One member entry. Both fields are optional: a bare `{}` member lives in
/// `<root>/<name>` and builds with its own default profiles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Member {
    /// Directory relative to the workspace root; defaults to the member name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Profiles to compose when this member is built as a dependency.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<String>,
}

/// A discovered workspace: the registry document plus the directory that
/// contained it.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    members: BTreeMap<String, Member>,
}

impl Workspace {
    /// Walk upward from `start` to the first ancestor containing the registry
    /// document. Returns `None` when no ancestor has one.
    pub fn discover(start: &Path) -> Result<Option<Self>, ConfigError> {
        for dir in start.ancestors() {
            let candidate = dir.join(WORKSPACE_FILE);
            if candidate.is_file() {
                return Self::load(dir).map(Some);
            }
        }
        Ok(None)
    }

    /// Load the registry document from a known workspace root.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(WORKSPACE_FILE);
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let members: BTreeMap<String, Member> =
            serde_yaml::from_str(&text).map_err(|source| ConfigError::Malformed {
                path,
                source,
            })?;
        Ok(Workspace {
            root: root.to_path_buf(),
            members,
        })
    }

    /// The directory containing the registry document.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Look up a member by name.
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }

    /// Absolute directory of a member, if declared.
    pub fn member_path(&self, name: &str) -> Option<PathBuf> {
        let member = self.members.get(name)?;
        let rel = member
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(name));
        Some(self.root.join(rel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discover_walks_upward() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(WORKSPACE_FILE),
            "libmath: {}\nlibio:\n  path: vendored/libio\n  profiles: [release]\n",
        )
        .unwrap();
        let nested = tmp.path().join("apps").join("tool");
        std::fs::create_dir_all(&nested).unwrap();

        let ws = Workspace::discover(&nested).unwrap().unwrap();
        assert_eq!(ws.root(), tmp.path());
        assert_eq!(ws.member_path("libmath"), Some(tmp.path().join("libmath")));
        assert_eq!(
            ws.member_path("libio"),
            Some(tmp.path().join("vendored/libio"))
        );
        assert_eq!(ws.member("libio").unwrap().profiles, vec!["release"]);
    }

    #[test]
    fn test_discover_without_registry() {
        let tmp = TempDir::new().unwrap();
        assert!(Workspace::discover(tmp.path()).unwrap().is_none());
    }

    #[test]
    fn test_unknown_member_is_none() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(WORKSPACE_FILE), "libmath: {}\n").unwrap();
        let ws = Workspace::load(tmp.path()).unwrap();
        assert!(ws.member_path("zlib").is_none());
    }
}
