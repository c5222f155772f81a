//! Project configuration: profile documents and their composition.
//!
//! A project is described by layered YAML profiles. `compose` merges an
//! ordered profile list over the built-in default document and produces one
//! effective [`Configuration`].

mod compose;
mod defaults;
mod document;
mod merge;

pub use compose::{compose, COMMON_PROFILE};
pub use defaults::{default_document, DEFAULT_DOCUMENT};
pub use document::{
    consolidated_path, load_consolidated, load_profile_document, profile_path,
    save_profile_document, CONSOLIDATED_FILE,
};

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by profile composition.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("profile `{name}` not found under `{}` (no entry in {CONSOLIDATED_FILE} and no catalyst.{name}.yaml)", root.display())]
    MissingProfile { name: String, root: PathBuf },

    #[error("duplicate profile `{name}` in composition request")]
    DuplicateProfile { name: String },

    #[error("malformed profile document `{}`", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("consolidated document `{}` must be a top-level mapping of profile names", path.display())]
    BadConsolidated { path: PathBuf },

    #[error("invalid configuration after composing {profiles:?}")]
    Invalid {
        profiles: Vec<String>,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to read `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The merged, effective project configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Configuration {
    pub meta: Meta,
    pub manifest: Manifest,

    #[serde(default)]
    pub dependencies: Vec<DependencyRecord>,

    #[serde(default)]
    pub features: Vec<FeatureEntry>,

    #[serde(default)]
    pub hooks: BTreeMap<String, Vec<HookAction>>,

    /// Profile names that produced this configuration, in merge order.
    /// Set by `compose`, never read from a document.
    #[serde(skip)]
    pub profiles: Vec<String>,
}

impl Configuration {
    /// Declared features, normalized to (name, default-enabled) pairs.
    pub fn feature_decls(&self) -> Vec<(String, bool)> {
        let mut decls = Vec::new();
        for entry in &self.features {
            match entry {
                FeatureEntry::Bare(name) => decls.push((name.clone(), false)),
                FeatureEntry::Defaulted(map) => {
                    for (name, default) in map {
                        decls.push((name.clone(), *default));
                    }
                }
            }
        }
        decls
    }

    /// Hook actions registered under `name`, empty if none.
    pub fn hook(&self, name: &str) -> &[HookAction] {
        self.hooks.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// `meta` document section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    /// Minimum tool version required by the project. Merges via numeric
    /// max over dotted triples rather than override.
    pub min_ver: String,

    /// Which build-graph backend `generate` targets by default.
    pub generator: Generator,
}

/// Graph backends selectable from the manifest.
///
/// The make backend exists but is chosen per-invocation, not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generator {
    Ninja,
    Minimal,
}

/// `manifest` document section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: ProjectKind,

    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provides: Option<String>,

    pub tooling: Tooling,

    pub dirs: Dirs,
}

impl Manifest {
    /// The library name exposed to dependents (`provides` or the project name).
    pub fn provided_name(&self) -> &str {
        self.provides.as_deref().unwrap_or(&self.name)
    }
}

/// What the project produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectKind {
    Executable,
    StaticLibrary,
    SharedLibrary,
    HeaderOnly,
}

impl ProjectKind {
    pub fn is_library(&self) -> bool {
        !matches!(self, ProjectKind::Executable)
    }
}

/// `manifest.tooling` section. Keys mirror the conventional environment
/// variable names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tooling {
    #[serde(rename = "CC")]
    pub cc: String,

    #[serde(rename = "CXX")]
    pub cxx: String,

    #[serde(rename = "CCFLAGS")]
    pub ccflags: String,

    #[serde(rename = "CXXFLAGS")]
    pub cxxflags: String,

    #[serde(rename = "FMT")]
    pub fmt: String,

    #[serde(rename = "LINTER")]
    pub linter: String,
}

/// `manifest.dirs` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dirs {
    #[serde(default)]
    pub include: Vec<PathBuf>,

    #[serde(default)]
    pub source: Vec<PathBuf>,

    pub build: PathBuf,
}

/// One entry of the `dependencies` sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyRecord {
    pub name: String,

    pub source: SourceKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    /// Directory of a local dependency, relative to the declaring project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Clone URL of a git dependency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Explicit include dir of a system dependency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<PathBuf>,

    /// Explicit library dir of a system dependency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lib: Option<PathBuf>,

    /// Platform triplet override for a vcpkg dependency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triplet: Option<String>,

    /// Profiles to compose when building a local dependency.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<String>,

    /// Extra libraries to link alongside the dependency itself.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub using: Vec<String>,

    #[serde(default)]
    pub linkage: Linkage,
}

impl DependencyRecord {
    /// A minimal record, used by the `add` operation.
    pub fn new(name: impl Into<String>, source: SourceKind) -> Self {
        DependencyRecord {
            name: name.into(),
            source,
            version: None,
            branch: None,
            path: None,
            url: None,
            include: None,
            lib: None,
            triplet: None,
            profiles: Vec::new(),
            using: Vec::new(),
            linkage: Linkage::default(),
        }
    }
}

/// Where a dependency comes from. Anything unrecognized falls back to a
/// best-effort pkg-config lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Local,
    System,
    Vcpkg,
    Git,
    #[serde(other)]
    Fallback,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SourceKind::Local => "local",
            SourceKind::System => "system",
            SourceKind::Vcpkg => "vcpkg",
            SourceKind::Git => "git",
            SourceKind::Fallback => "fallback",
        };
        f.write_str(s)
    }
}

/// How a dependency links into the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Linkage {
    Static,
    #[default]
    Shared,
    HeaderOnly,
}

impl Linkage {
    /// Whether a `-l` flag is emitted for this linkage.
    pub fn links(&self) -> bool {
        !matches!(self, Linkage::HeaderOnly)
    }
}

/// One declared feature: a bare name (disabled by default) or a
/// `{name: default}` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureEntry {
    Bare(String),
    Defaulted(BTreeMap<String, bool>),
}

/// One lifecycle hook action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HookAction {
    Command { command: String },
    Script { script: PathBuf },
    Line(String),
}

/// Hook names the tool invokes. Anything else in `hooks` draws a warning.
pub const RECOGNIZED_HOOKS: &[&str] = &[
    "pre-build",
    "post-build",
    "pre-generate",
    "post-generate",
    "pre-fetch",
    "post-fetch",
    "pre-clean",
    "post-clean",
    "pre-run",
    "post-run",
    "pre-test",
    "post-test",
    "pre-link",
    "post-link",
    "on-build-failure",
];
