//! System dependencies: preinstalled libraries found via explicit paths,
//! pkg-config, or conventional platform directories.

use std::path::{Path, PathBuf};

use crate::config::DependencyRecord;
use crate::resolver::{DependencyError, ResolvedFlags};
use crate::util::process::{find_executable, ProcessBuilder};
use crate::util::Shell;

pub fn resolve(dep: &DependencyRecord, shell: &Shell) -> Result<ResolvedFlags, DependencyError> {
    // Explicit paths in the record beat any discovery mechanism.
    if dep.include.is_some() || dep.lib.is_some() {
        let mut flags = ResolvedFlags::default();
        if let Some(include) = &dep.include {
            flags.add_include(include);
        }
        if let Some(lib) = &dep.lib {
            flags.add_lib_path(lib);
        }
        if dep.linkage.links() {
            flags.add_lib(&dep.name);
        }
        return Ok(flags);
    }

    if let Some(flags) = pkg_config(&dep.name) {
        return Ok(flags);
    }

    shell.verbose(format!(
        "pkg-config has no entry for `{}`, using platform paths",
        dep.name
    ));
    Ok(platform_fallback(dep))
}

/// Query pkg-config for the dependency. `None` covers every miss: tool not
/// installed, unknown package, malformed output.
fn pkg_config(name: &str) -> Option<ResolvedFlags> {
    let tool = find_executable("pkg-config")?;

    let cflags = query(&tool, "--cflags", name)?;
    let libs = query(&tool, "--libs", name)?;

    let mut flags = ResolvedFlags::default();
    for token in cflags.split_whitespace() {
        flags.cxxflags.push(token.to_string());
        flags.ccflags.push(token.to_string());
    }
    for token in libs.split_whitespace() {
        if token.starts_with("-l") {
            flags.ldlibs.push(token.to_string());
        } else {
            flags.ldflags.push(token.to_string());
        }
    }
    Some(flags)
}

fn query(tool: &Path, flag: &str, name: &str) -> Option<String> {
    let output = ProcessBuilder::new(tool).arg(flag).arg(name).exec().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Conventional install prefix: exactly one include path, one library path,
/// one bare `-l`.
fn platform_fallback(dep: &DependencyRecord) -> ResolvedFlags {
    let prefix = if cfg!(target_os = "macos") {
        PathBuf::from("/usr/local")
    } else {
        PathBuf::from("/usr")
    };

    let mut flags = ResolvedFlags::default();
    flags.add_include(&prefix.join("include"));
    flags.add_lib_path(&prefix.join("lib"));
    if dep.linkage.links() {
        flags.add_lib(&dep.name);
    }
    flags
}
