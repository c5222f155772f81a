//! Git dependencies resolve to flags pointing at the clone the fetch
//! pipeline maintains under `<build-dir>/catalyst-libs/<name>`.

use std::path::Path;

use crate::config::DependencyRecord;
use crate::resolver::{ResolvedFlags, LIBS_DIR};

pub fn resolve(dep: &DependencyRecord, build_dir: &Path) -> ResolvedFlags {
    let clone = build_dir.join(LIBS_DIR).join(&dep.name);
    clone_layout_flags(dep, &clone)
}

/// Flags for a checkout laid out the conventional way: headers under
/// `include/`, build outputs under `build/`. Workspace symlinks share this
/// layout, so the sibling short-circuit reuses it.
pub fn clone_layout_flags(dep: &DependencyRecord, clone: &Path) -> ResolvedFlags {
    let mut flags = ResolvedFlags::default();
    flags.add_include(&clone.join("include"));
    flags.add_lib_path(&clone.join("build"));
    if dep.linkage.links() {
        flags.add_lib(&dep.name);
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceKind;
    use std::path::PathBuf;

    #[test]
    fn test_flags_point_into_clone_layout() {
        let dep = DependencyRecord::new("fmt", SourceKind::Git);
        let flags = resolve(&dep, &PathBuf::from("/proj/build"));
        assert_eq!(
            flags.cxxflags,
            vec![format!("-I/proj/build/{LIBS_DIR}/fmt/include")]
        );
        assert_eq!(
            flags.ldflags,
            vec![format!("-L/proj/build/{LIBS_DIR}/fmt/build")]
        );
        assert_eq!(flags.ldlibs, vec!["-lfmt"]);
    }
}
