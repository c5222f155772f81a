//! Translation-unit discovery.
//!
//! Each declared source directory is walked recursively for C/C++ files. A
//! `catalyst-ignore.yaml` inside a source directory maps profile names to
//! filename regexes; files matching a pattern listed for any composed
//! profile are skipped.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::WalkDir;

use crate::graph::GraphError;

/// File name of the per-directory ignore manifest.
pub const IGNORE_FILE: &str = "catalyst-ignore.yaml";

const C_EXTENSIONS: &[&str] = &["c"];
const CXX_EXTENSIONS: &[&str] = &["cc", "cpp", "cxx", "c++", "C"];

/// Whether a discovered file compiles with the C or the C++ rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    C,
    Cxx,
}

/// Classify a path by extension; `None` for non-source files.
pub fn language_of(path: &Path) -> Option<Language> {
    let ext = path.extension()?.to_str()?;
    // `.C` is traditionally C++; everything else compares case-insensitively.
    if ext == "C" || CXX_EXTENSIONS.contains(&ext.to_lowercase().as_str()) {
        Some(Language::Cxx)
    } else if C_EXTENSIONS.contains(&ext) {
        Some(Language::C)
    } else {
        None
    }
}

/// Walk the declared source dirs (relative to `base`) and return the kept
/// translation units in deterministic order.
pub fn discover_sources(
    base: &Path,
    source_dirs: &[PathBuf],
    profiles: &[String],
) -> Result<Vec<PathBuf>, GraphError> {
    let mut sources = Vec::new();
    for dir in source_dirs {
        let dir = base.join(dir);
        if !dir.is_dir() {
            continue;
        }
        let ignores = load_ignores(&dir, profiles)?;

        for entry in WalkDir::new(&dir).sort_by_file_name() {
            let entry = entry.map_err(|err| GraphError::Io {
                path: err.path().map(Path::to_path_buf).unwrap_or_else(|| dir.clone()),
                source: err.into(),
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || language_of(path).is_none() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if ignores.iter().any(|re| re.is_match(&name)) {
                continue;
            }
            sources.push(path.to_path_buf());
        }
    }
    Ok(sources)
}

/// Compile the ignore patterns the composed profiles select in `dir`.
fn load_ignores(dir: &Path, profiles: &[String]) -> Result<Vec<Regex>, GraphError> {
    let path = dir.join(IGNORE_FILE);
    if !path.is_file() {
        return Ok(Vec::new());
    }

    let text = std::fs::read_to_string(&path).map_err(|source| GraphError::Io {
        path: path.clone(),
        source,
    })?;
    let manifest: BTreeMap<String, Vec<String>> =
        serde_yaml::from_str(&text).map_err(|source| GraphError::IgnoreManifest {
            path,
            source,
        })?;

    let mut patterns = Vec::new();
    for profile in profiles {
        let Some(list) = manifest.get(profile) else {
            continue;
        };
        for pattern in list {
            let regex = Regex::new(pattern).map_err(|source| GraphError::Pattern {
                pattern: pattern.clone(),
                source,
            })?;
            patterns.push(regex);
        }
    }
    Ok(patterns)
}
