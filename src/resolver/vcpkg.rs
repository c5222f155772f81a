//! Vcpkg dependencies, read straight from the package cache's file layout
//! rather than by parsing CLI output:
//!
//! ```text
//! $VCPKG_ROOT/
//! ├── packages/<name>_<triplet>/lib/   # per-port build outputs
//! └── installed/<triplet>/{include,lib}
//! ```

use std::path::{Path, PathBuf};

use crate::config::DependencyRecord;
use crate::resolver::{DependencyError, ResolvedFlags};

/// Library file extensions worth turning into `-l` flags.
const LIB_EXTENSIONS: &[&str] = &["a", "so", "dylib", "lib"];

pub fn resolve(dep: &DependencyRecord) -> Result<ResolvedFlags, DependencyError> {
    let root = vcpkg_root().ok_or(DependencyError::MissingEnv {
        dependency: dep.name.clone(),
        var: "VCPKG_ROOT",
    })?;

    let triplet = dep
        .triplet
        .clone()
        .unwrap_or_else(|| default_triplet().to_string());

    let lib_dir = root
        .join("packages")
        .join(format!("{}_{}", dep.name, triplet))
        .join("lib");

    let mut flags = ResolvedFlags::default();
    if !dep.linkage.links() {
        return Ok(flags);
    }

    let stems = library_stems(&lib_dir);
    if stems.is_empty() {
        // Port not installed for this triplet (or a header-mostly port with
        // no archives): assume the conventional library name.
        flags.add_lib(&dep.name);
    } else {
        for stem in stems {
            flags.add_lib(&stem);
        }
    }
    Ok(flags)
}

/// The `VCPKG_ROOT` the cache lives under, if configured.
pub fn vcpkg_root() -> Option<PathBuf> {
    std::env::var_os("VCPKG_ROOT").map(PathBuf::from)
}

/// Platform-default triplet used when the record does not pin one.
pub fn default_triplet() -> &'static str {
    if cfg!(target_os = "windows") {
        "x64-windows"
    } else if cfg!(all(target_os = "macos", target_arch = "aarch64")) {
        "arm64-osx"
    } else if cfg!(target_os = "macos") {
        "x64-osx"
    } else {
        "x64-linux"
    }
}

/// Distinct linkable stems under `dir`, `lib` prefix stripped, sorted.
fn library_stems(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut stems: Vec<String> = entries
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            let ext = path.extension()?.to_str()?;
            if !LIB_EXTENSIONS.contains(&ext) {
                return None;
            }
            let stem = path.file_stem()?.to_str()?;
            Some(stem.strip_prefix("lib").unwrap_or(stem).to_string())
        })
        .collect();
    stems.sort();
    stems.dedup();
    stems
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceKind;
    use tempfile::TempDir;

    #[test]
    fn test_library_stems_strip_prefix_and_dedup() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("libzlib.a"), b"").unwrap();
        std::fs::write(tmp.path().join("libzlib.so"), b"").unwrap();
        std::fs::write(tmp.path().join("zstd.lib"), b"").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), b"").unwrap();

        assert_eq!(library_stems(tmp.path()), vec!["zlib", "zstd"]);
    }

    #[test]
    fn test_missing_dir_yields_no_stems() {
        let tmp = TempDir::new().unwrap();
        assert!(library_stems(&tmp.path().join("absent")).is_empty());
    }

    #[test]
    fn test_record_triplet_overrides_default() {
        let mut dep = DependencyRecord::new("zlib", SourceKind::Vcpkg);
        dep.triplet = Some("wasm32-emscripten".to_string());
        assert_eq!(dep.triplet.as_deref(), Some("wasm32-emscripten"));
        assert!(!default_triplet().is_empty());
    }
}
