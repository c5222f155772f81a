//! Implementation of `catalyst clean`.

use std::path::Path;

use anyhow::Result;

use crate::config::compose;
use crate::ops::hooks::run_hooks;
use crate::util::{fs, Shell, Status};

#[derive(Debug, Clone, Default)]
pub struct CleanOptions {
    pub profiles: Vec<String>,
}

/// Delete the composed configuration's build directory.
pub fn clean(root: &Path, opts: &CleanOptions, shell: &Shell) -> Result<()> {
    let config = compose(&opts.profiles, root, shell)?;
    run_hooks(&config, "pre-clean", root, shell)?;

    let build_dir = root.join(&config.manifest.dirs.build);
    fs::remove_dir_all_if_exists(&build_dir)?;
    shell.status(Status::Cleaned, build_dir.display());

    run_hooks(&config, "post-clean", root, shell)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clean_removes_build_dir() {
        let tmp = TempDir::new().unwrap();
        let build = tmp.path().join("build");
        std::fs::create_dir_all(build.join("obj")).unwrap();
        std::fs::write(build.join("app"), b"").unwrap();

        clean(tmp.path(), &CleanOptions::default(), &Shell::silent()).unwrap();
        assert!(!build.exists());
    }

    #[test]
    fn test_clean_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        clean(tmp.path(), &CleanOptions::default(), &Shell::silent()).unwrap();
        clean(tmp.path(), &CleanOptions::default(), &Shell::silent()).unwrap();
    }
}
