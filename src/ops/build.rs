//! Implementation of `catalyst build`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::config::compose;
use crate::graph::BackendKind;
use crate::ops::fetch::{fetch_with, FetchOptions};
use crate::ops::generate::{generate_with, GenerateOptions};
use crate::ops::hooks::run_hooks;
use crate::resolver::SubBuild;
use crate::util::process::{find_executable, ProcessBuilder};
use crate::util::{Shell, Status};

/// Options for the build pipeline.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub profiles: Vec<String>,
    pub features: Vec<String>,
    pub backend: Option<BackendKind>,

    /// Regenerate the graph even when one is already on disk.
    pub force_generate: bool,
}

/// Run the full pipeline: generate when needed, fetch, then hand the graph
/// to the external executor.
pub fn build(root: &Path, opts: &BuildOptions, shell: &Shell) -> Result<()> {
    let mut visited = BTreeSet::new();
    build_with(root, opts, shell, &mut visited)
}

pub(crate) fn build_with(
    root: &Path,
    opts: &BuildOptions,
    shell: &Shell,
    visited: &mut BTreeSet<PathBuf>,
) -> Result<()> {
    let config = compose(&opts.profiles, root, shell)?;
    run_hooks(&config, "pre-build", root, shell)?;

    let result = build_inner(root, opts, shell, visited);
    if result.is_err() {
        // Diagnostics from the failure hook must not mask the build error.
        if let Err(hook_err) = run_hooks(&config, "on-build-failure", root, shell) {
            shell.warn(format!("on-build-failure hook failed: {hook_err:#}"));
        }
        return result;
    }

    run_hooks(&config, "post-build", root, shell)?;
    shell.status(Status::Finished, config.manifest.name);
    Ok(())
}

fn build_inner(
    root: &Path,
    opts: &BuildOptions,
    shell: &Shell,
    visited: &mut BTreeSet<PathBuf>,
) -> Result<()> {
    let config = compose(&opts.profiles, root, shell)?;
    let backend = opts
        .backend
        .unwrap_or_else(|| config.meta.generator.into());
    let build_dir = root.join(&config.manifest.dirs.build);
    let graph_path = build_dir.join(backend.file_name());

    if opts.force_generate || !graph_path.is_file() {
        let generate_opts = GenerateOptions {
            profiles: opts.profiles.clone(),
            features: opts.features.clone(),
            backend: opts.backend,
        };
        let host = BuildHost::new(shell);
        generate_with(root, &generate_opts, shell, &host, visited)?;
    }

    fetch_with(
        root,
        &FetchOptions {
            profiles: opts.profiles.clone(),
            force: false,
        },
        shell,
    )?;

    let Some(executor) = backend.executor() else {
        bail!(
            "the minimal backend only emits `{}`; build with ninja or make",
            graph_path.display()
        );
    };
    let program = find_executable(executor)
        .with_context(|| format!("`{executor}` not found in PATH"))?;
    tracing::debug!("running {} on {}", program.display(), graph_path.display());

    shell.status(Status::Building, config.manifest.name.clone());
    let status = ProcessBuilder::new(program)
        .arg("-f")
        .arg(&graph_path)
        .cwd(root)
        .status()
        .with_context(|| format!("failed to launch {executor}"))?;
    if !status.success() {
        bail!("{executor} failed for `{}`", config.manifest.name);
    }
    Ok(())
}

/// The build pipeline acting as the resolver's rebuild host: a local
/// dependency is built in its own directory with forced regeneration, with
/// the visited set threaded through for cycle detection.
pub struct BuildHost<'a> {
    shell: &'a Shell,
}

impl<'a> BuildHost<'a> {
    pub fn new(shell: &'a Shell) -> Self {
        BuildHost { shell }
    }
}

impl SubBuild for BuildHost<'_> {
    fn rebuild(
        &self,
        dir: &Path,
        profiles: &[String],
        visited: &mut BTreeSet<PathBuf>,
    ) -> Result<()> {
        let opts = BuildOptions {
            profiles: profiles.to_vec(),
            force_generate: true,
            ..Default::default()
        };
        build_with(dir, &opts, self.shell, visited)
    }
}
