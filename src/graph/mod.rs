//! Build graph construction and rendering.
//!
//! A [`BuildGraph`] is assembled fresh on every generate call from the
//! composed configuration, the requested feature set, and the resolved
//! dependency flags, then rendered through a [`BuildWriter`] backend and
//! discarded. Nothing in here shells out; emission is pure.

pub mod backend;
mod emit;
mod sources;

pub use backend::{BackendKind, BuildWriter};
pub use emit::{artifact_path, Emitter};
pub use sources::discover_sources;

use std::collections::BTreeSet;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("rule `{rule}` cannot produce multiple outputs ({})", outputs.join(", "))]
    MultipleOutputs { rule: String, outputs: Vec<String> },

    #[error("unknown rule `{name}`")]
    UnknownRule { name: String },

    #[error("malformed ignore manifest `{}`", path.display())]
    IgnoreManifest {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid ignore pattern `{pattern}`")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("io error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A named command template. `$in`, `$out` and `$<variable>` placeholders are
/// interpreted by each backend.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub command: String,
    pub depfile: Option<String>,
    /// Depfile flavor (`gcc` or `msvc`), meaningful only alongside `depfile`.
    pub dep_format: Option<String>,
    pub description: Option<String>,
}

impl Rule {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Rule {
            name: name.into(),
            command: command.into(),
            depfile: None,
            dep_format: None,
            description: None,
        }
    }

    pub fn depfile(mut self, depfile: impl Into<String>) -> Self {
        self.depfile = Some(depfile.into());
        self
    }

    pub fn dep_format(mut self, format: impl Into<String>) -> Self {
        self.dep_format = Some(format.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One build statement: inputs through a rule to outputs. Implicit deps
/// trigger rebuilds but never appear in the rule's `$in` expansion.
#[derive(Debug, Clone)]
pub struct BuildEdge {
    pub rule: String,
    pub inputs: Vec<PathBuf>,
    pub implicit_deps: Vec<PathBuf>,
    pub outputs: Vec<PathBuf>,
}

impl BuildEdge {
    pub fn new(rule: impl Into<String>, inputs: Vec<PathBuf>, outputs: Vec<PathBuf>) -> Self {
        BuildEdge {
            rule: rule.into(),
            inputs,
            implicit_deps: Vec::new(),
            outputs,
        }
    }

    pub fn implicit_deps(mut self, deps: Vec<PathBuf>) -> Self {
        self.implicit_deps = deps;
        self
    }
}

/// The complete graph for one generate call.
#[derive(Debug, Clone, Default)]
pub struct BuildGraph {
    pub comments: Vec<String>,
    pub variables: Vec<(String, String)>,
    pub rules: Vec<Rule>,
    pub edges: Vec<BuildEdge>,
    pub defaults: Vec<PathBuf>,
}

impl BuildGraph {
    /// Replay the graph through a writer in declaration order.
    pub fn render(&self, writer: &mut dyn BuildWriter) -> Result<(), GraphError> {
        for comment in &self.comments {
            writer.add_comment(comment);
        }
        for (name, value) in &self.variables {
            writer.add_variable(name, value);
        }
        for rule in &self.rules {
            writer.add_rule(rule)?;
        }
        for edge in &self.edges {
            writer.add_build(edge)?;
        }
        for target in &self.defaults {
            writer.add_default(target);
        }
        Ok(())
    }
}

/// Feature switches requested for one invocation, layered over the profile
/// defaults. `no-<feature>` tokens disable; plain tokens enable; an explicit
/// enable beats a `no-` token for the same feature.
#[derive(Debug, Clone, Default)]
pub struct FeatureSet {
    enabled: BTreeSet<String>,
    disabled: BTreeSet<String>,
}

impl FeatureSet {
    pub fn parse<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = FeatureSet::default();
        for token in tokens {
            let token = token.as_ref();
            match token.strip_prefix("no-") {
                Some(name) => {
                    set.disabled.insert(name.to_string());
                }
                None => {
                    set.enabled.insert(token.to_string());
                }
            }
        }
        set
    }

    /// Effective state of a feature declared with `default`.
    pub fn state(&self, name: &str, default: bool) -> bool {
        if self.enabled.contains(name) {
            true
        } else if self.disabled.contains(name) {
            false
        } else {
            default
        }
    }
}
