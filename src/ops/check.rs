//! Implementation of `catalyst check`: run the configured linter or
//! formatter over every translation unit, in parallel.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::compose;
use crate::graph::discover_sources;
use crate::util::process::{find_executable, ProcessBuilder};
use crate::util::{Shell, Status};

#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub profiles: Vec<String>,

    /// Run the formatter in place instead of the linter.
    pub format: bool,

    /// Worker count; defaults to available parallelism.
    pub jobs: Option<usize>,
}

/// Sweep the discovered sources with the configured external tool. Failures
/// are aggregated; the sweep never stops early.
pub fn check(root: &Path, opts: &CheckOptions, shell: &Shell) -> Result<()> {
    let config = compose(&opts.profiles, root, shell)?;
    let tool_name = if opts.format {
        &config.manifest.tooling.fmt
    } else {
        &config.manifest.tooling.linter
    };
    let tool = find_executable(tool_name)
        .with_context(|| format!("`{tool_name}` not found in PATH"))?;

    let sources = discover_sources(root, &config.manifest.dirs.source, &config.profiles)?;
    if sources.is_empty() {
        shell.status(Status::Checking, "no sources found");
        return Ok(());
    }

    let jobs = opts
        .jobs
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(usize::from)
                .unwrap_or(1)
        })
        .max(1)
        .min(sources.len());
    shell.status(
        Status::Checking,
        format!("{} files with {} ({jobs} jobs)", sources.len(), tool_name),
    );

    let bar = ProgressBar::new(sources.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let queue = Mutex::new(sources);
    let failed = AtomicBool::new(false);

    std::thread::scope(|scope| {
        for _ in 0..jobs {
            scope.spawn(|| loop {
                let Some(source) = next_path(&queue) else {
                    break;
                };
                if !check_one(&tool, opts.format, root, &source, shell) {
                    failed.store(true, Ordering::Relaxed);
                }
                bar.inc(1);
            });
        }
    });
    bar.finish_and_clear();

    if failed.load(Ordering::Relaxed) {
        bail!("{tool_name} reported problems");
    }
    Ok(())
}

fn next_path(queue: &Mutex<Vec<PathBuf>>) -> Option<PathBuf> {
    let mut queue = queue.lock().ok()?;
    queue.pop()
}

fn check_one(tool: &Path, format: bool, root: &Path, source: &Path, shell: &Shell) -> bool {
    let mut builder = ProcessBuilder::new(tool).cwd(root);
    if format {
        builder = builder.arg("-i");
    }
    let builder = builder.arg(source);

    match builder.exec() {
        Ok(output) if output.status.success() => true,
        Ok(output) => {
            shell.error(format!(
                "{}: {}",
                source.display(),
                String::from_utf8_lossy(&output.stdout).trim()
            ));
            false
        }
        Err(err) => {
            shell.error(format!("{}: {err:#}", source.display()));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn scaffold(root: &Path, linter: &str) {
        crate::config::save_profile_document(
            root,
            "common",
            &serde_yaml::from_str(&format!(
                "manifest: {{ name: app, tooling: {{ LINTER: \"{linter}\" }} }}"
            ))
            .unwrap(),
        )
        .unwrap();
        let src = root.join("src");
        std::fs::create_dir_all(&src).unwrap();
        for name in ["a.c", "b.c", "c.cpp"] {
            std::fs::write(src.join(name), b"int x;\n").unwrap();
        }
    }

    #[test]
    #[cfg(unix)]
    fn test_sweep_passes_with_a_true_tool() {
        let tmp = TempDir::new().unwrap();
        scaffold(tmp.path(), "true");
        check(tmp.path(), &CheckOptions::default(), &Shell::silent()).unwrap();
    }

    #[test]
    #[cfg(unix)]
    fn test_sweep_aggregates_failures() {
        let tmp = TempDir::new().unwrap();
        scaffold(tmp.path(), "false");
        let opts = CheckOptions {
            jobs: Some(2),
            ..Default::default()
        };
        let err = check(tmp.path(), &opts, &Shell::silent()).unwrap_err();
        assert!(err.to_string().contains("reported problems"));
    }

    #[test]
    fn test_missing_tool_is_an_error() {
        let tmp = TempDir::new().unwrap();
        scaffold(tmp.path(), "no-such-linter-anywhere");
        assert!(check(tmp.path(), &CheckOptions::default(), &Shell::silent()).is_err());
    }

    #[test]
    #[cfg(unix)]
    fn test_no_sources_is_ok() {
        let tmp = TempDir::new().unwrap();
        crate::config::save_profile_document(
            tmp.path(),
            "common",
            &serde_yaml::from_str("manifest: { name: app, tooling: { LINTER: \"true\" } }")
                .unwrap(),
        )
        .unwrap();
        check(tmp.path(), &CheckOptions::default(), &Shell::silent()).unwrap();
    }
}
