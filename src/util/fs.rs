//! Filesystem utilities.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents)
        .with_context(|| format!("failed to write file: {}", path.display()))
}

/// Remove a directory and all its contents, if it exists.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("failed to remove directory: {}", path.display()))?;
    }
    Ok(())
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

/// Create a symlink (platform-aware).
#[cfg(unix)]
pub fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(windows)]
pub fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    if src.is_dir() {
        std::os::windows::fs::symlink_dir(src, dst)
    } else {
        std::os::windows::fs::symlink_file(src, dst)
    }
}

/// Create or refresh a symlink so that `link` points at `target`.
///
/// The stored target is relative to the link's directory, so the tree stays
/// valid when moved as a whole. Idempotent: an existing link with the right
/// target is left alone; a link with a different target is replaced.
pub fn refresh_symlink(target: &Path, link: &Path) -> Result<bool> {
    let dest = match link.parent() {
        Some(parent) => relative_path(parent, target),
        None => target.to_path_buf(),
    };

    if let Ok(existing) = fs::read_link(link) {
        if existing == dest {
            return Ok(false);
        }
        fs::remove_file(link)
            .with_context(|| format!("failed to remove stale link: {}", link.display()))?;
    }

    if let Some(parent) = link.parent() {
        ensure_dir(parent)?;
    }
    symlink(&dest, link)
        .with_context(|| format!("failed to link {} -> {}", link.display(), target.display()))?;
    Ok(true)
}
