//! Implementation of `catalyst run` and `catalyst test`.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::config::{compose, ProjectKind};
use crate::graph::artifact_path;
use crate::ops::build::{build, BuildOptions};
use crate::ops::hooks::run_hooks;
use crate::util::process::ProcessBuilder;
use crate::util::{Shell, Status};

/// Profile appended implicitly by `catalyst test`.
pub const TEST_PROFILE: &str = "test";

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub build: BuildOptions,

    /// Arguments forwarded to the produced binary.
    pub args: Vec<String>,
}

/// Build the project, then execute the produced binary.
pub fn run(root: &Path, opts: &RunOptions, shell: &Shell) -> Result<()> {
    execute(root, opts, shell, "pre-run", "post-run")
}

/// Like `run`, but composes the `test` profile as the last layer.
pub fn test(root: &Path, opts: &RunOptions, shell: &Shell) -> Result<()> {
    let mut opts = opts.clone();
    if !opts.build.profiles.iter().any(|p| p == TEST_PROFILE) {
        opts.build.profiles.push(TEST_PROFILE.to_string());
    }
    execute(root, &opts, shell, "pre-test", "post-test")
}

fn execute(
    root: &Path,
    opts: &RunOptions,
    shell: &Shell,
    pre_hook: &str,
    post_hook: &str,
) -> Result<()> {
    let config = compose(&opts.build.profiles, root, shell)?;
    if config.manifest.kind != ProjectKind::Executable {
        bail!(
            "`{}` is a {:?} project and produces nothing to execute",
            config.manifest.name,
            config.manifest.kind
        );
    }

    build(root, &opts.build, shell)?;

    let artifact = artifact_path(&config.manifest)
        .map(|rel| root.join(rel))
        .context("project has no link output")?;

    run_hooks(&config, pre_hook, root, shell)?;
    shell.status(Status::Running, artifact.display());

    let status = ProcessBuilder::new(&artifact)
        .args(&opts.args)
        .cwd(root)
        .status()
        .with_context(|| format!("failed to launch {}", artifact.display()))?;
    if !status.success() {
        bail!(
            "`{}` exited with {}",
            config.manifest.name,
            status.code().map(|c| c.to_string()).unwrap_or_else(|| "signal".to_string())
        );
    }

    run_hooks(&config, post_hook, root, shell)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_non_executable_project_is_rejected() {
        let tmp = TempDir::new().unwrap();
        crate::config::save_profile_document(
            tmp.path(),
            "common",
            &serde_yaml::from_str("manifest: { name: libx, type: static-library }").unwrap(),
        )
        .unwrap();

        let err = run(tmp.path(), &RunOptions::default(), &Shell::silent()).unwrap_err();
        assert!(err.to_string().contains("nothing to execute"));
    }

    #[test]
    fn test_test_appends_the_test_profile_once() {
        let mut opts = RunOptions::default();
        opts.build.profiles.push(TEST_PROFILE.to_string());
        // A second push would make compose reject the duplicate; the missing
        // test profile itself is the error we expect here.
        let tmp = TempDir::new().unwrap();
        let err = test(tmp.path(), &opts, &Shell::silent()).unwrap_err();
        assert!(err.to_string().contains("profile `test` not found"));
    }
}
