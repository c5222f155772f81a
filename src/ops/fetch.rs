//! Implementation of `catalyst fetch`: git dependency clones and workspace
//! symlink refresh.

use std::path::Path;

use anyhow::{bail, Context, Result};
use git2::Repository;
use url::Url;

use crate::config::{compose, DependencyRecord, SourceKind};
use crate::ops::hooks::run_hooks;
use crate::resolver::LIBS_DIR;
use crate::util::{fs, Shell, Status};
use crate::workspace::Workspace;

#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub profiles: Vec<String>,

    /// Re-clone even when a checkout already exists.
    pub force: bool,
}

pub fn fetch(root: &Path, opts: &FetchOptions, shell: &Shell) -> Result<()> {
    let config = compose(&opts.profiles, root, shell)?;
    run_hooks(&config, "pre-fetch", root, shell)?;
    fetch_inner(root, opts, shell)?;
    run_hooks(&config, "post-fetch", root, shell)?;
    Ok(())
}

/// Fetch body without the hooks; the build pipeline runs it inside its own
/// hook bracket.
pub(crate) fn fetch_with(root: &Path, opts: &FetchOptions, shell: &Shell) -> Result<()> {
    fetch_inner(root, opts, shell)
}

fn fetch_inner(root: &Path, opts: &FetchOptions, shell: &Shell) -> Result<()> {
    let config = compose(&opts.profiles, root, shell)?;
    let build_dir = root.join(&config.manifest.dirs.build);
    let libs_dir = build_dir.join(LIBS_DIR);
    let workspace = Workspace::discover(root)?;

    for dep in &config.dependencies {
        // Workspace siblings are linked, never cloned.
        if let Some(member_dir) = workspace
            .as_ref()
            .and_then(|ws| ws.member_path(&dep.name))
        {
            if fs::refresh_symlink(&member_dir, &libs_dir.join(&dep.name))? {
                shell.status(
                    Status::Linking,
                    format!("{} -> {}", dep.name, member_dir.display()),
                );
            }
            continue;
        }

        if dep.source != SourceKind::Git {
            continue;
        }

        let dest = libs_dir.join(&dep.name);
        if dest.exists() {
            if !opts.force {
                shell.status(Status::Skipped, format!("{} (already fetched)", dep.name));
                continue;
            }
            fs::remove_dir_all_if_exists(&dest)?;
        }

        clone(dep, &dest, shell)
            .with_context(|| format!("failed to fetch dependency `{}`", dep.name))?;
    }
    Ok(())
}

fn clone(dep: &DependencyRecord, dest: &Path, shell: &Shell) -> Result<()> {
    let Some(url) = &dep.url else {
        bail!("git dependency `{}` has no url", dep.name);
    };
    // git2 takes real URLs and local paths alike; anything else is almost
    // certainly a typo worth flagging before the clone fails obscurely.
    if Url::parse(url).is_err() && !Path::new(url).exists() {
        shell.warn(format!(
            "`{url}` for dependency `{}` is neither a URL nor a local path",
            dep.name
        ));
    }

    shell.status(Status::Fetching, format!("{} ({url})", dep.name));
    let repo = Repository::clone(url, dest)
        .with_context(|| format!("git clone of {url} failed"))?;

    // Prefer a branch; otherwise try the version as a tag (with and without
    // the `v` prefix). No pin means the remote default head.
    let revisions: Vec<String> = match (&dep.branch, &dep.version) {
        (Some(branch), _) => vec![format!("origin/{branch}"), branch.clone()],
        (None, Some(version)) => vec![format!("v{version}"), version.clone()],
        (None, None) => Vec::new(),
    };
    if revisions.is_empty() {
        return Ok(());
    }

    for revspec in &revisions {
        if checkout(&repo, revspec).is_ok() {
            tracing::debug!("checked out `{revspec}` for `{}`", dep.name);
            return Ok(());
        }
    }
    bail!(
        "none of `{}` exist in {url} for dependency `{}`",
        revisions.join("`, `"),
        dep.name
    );
}

fn checkout(repo: &Repository, revspec: &str) -> Result<(), git2::Error> {
    let (object, reference) = repo.revparse_ext(revspec)?;
    repo.checkout_tree(&object, None)?;
    match reference.and_then(|r| r.name().map(String::from)) {
        Some(name) => repo.set_head(&name)?,
        None => repo.set_head_detached(object.id())?,
    }
    Ok(())
}
