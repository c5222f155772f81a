//! Implementation of `catalyst generate`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::compose;
use crate::graph::{BackendKind, Emitter, FeatureSet};
use crate::ops::hooks::run_hooks;
use crate::ops::BuildHost;
use crate::resolver::{Resolver, SubBuild};
use crate::util::{fs, Shell, Status};
use crate::workspace::Workspace;

/// Options for graph generation.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Profiles to compose, in order (after the implicit `common`).
    pub profiles: Vec<String>,

    /// Feature tokens (`name` enables, `no-name` disables).
    pub features: Vec<String>,

    /// Backend override; defaults to the manifest's `meta.generator`.
    pub backend: Option<BackendKind>,
}

/// Generate the build graph file. Returns its path.
pub fn generate(root: &Path, opts: &GenerateOptions, shell: &Shell) -> Result<PathBuf> {
    let host = BuildHost::new(shell);
    let mut visited = BTreeSet::new();
    generate_with(root, opts, shell, &host, &mut visited)
}

/// Generation body shared with the build pipeline, which supplies its own
/// rebuild host and visited set for local-dependency recursion.
pub(crate) fn generate_with(
    root: &Path,
    opts: &GenerateOptions,
    shell: &Shell,
    host: &dyn SubBuild,
    visited: &mut BTreeSet<PathBuf>,
) -> Result<PathBuf> {
    let config = compose(&opts.profiles, root, shell)?;
    run_hooks(&config, "pre-generate", root, shell)?;

    let build_dir = root.join(&config.manifest.dirs.build);
    let workspace = Workspace::discover(root)?;

    let resolver = Resolver::new(root, build_dir.clone(), workspace.as_ref(), host, shell);
    let resolved = resolver.resolve(&config, visited)?;
    tracing::debug!(
        "resolved {} dependencies for `{}`",
        config.dependencies.len(),
        config.manifest.name
    );

    let features = FeatureSet::parse(&opts.features);
    let graph = Emitter::new(root).plan(&config, &features, &resolved)?;

    let backend = opts
        .backend
        .unwrap_or_else(|| config.meta.generator.into());
    let mut writer = backend.writer();
    graph.render(writer.as_mut())?;

    fs::ensure_dir(&build_dir)?;
    let graph_path = build_dir.join(backend.file_name());
    fs::write_string(&graph_path, &writer.finish())
        .with_context(|| format!("failed to write {}", graph_path.display()))?;

    shell.status(Status::Generating, graph_path.display());
    run_hooks(&config, "post-generate", root, shell)?;
    Ok(graph_path)
}
