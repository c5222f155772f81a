//! Local-path dependencies: sibling project directories built in place.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::config::{compose, DependencyRecord};
use crate::resolver::{DependencyError, ResolvedFlags, SubBuild};
use crate::util::{Shell, Status};

/// Resolve a `source: local` dependency.
///
/// The dependency's project is composed with its declared profile list and
/// rebuilt through the host before its include/build directories are turned
/// into flags. `visited` carries the canonical directories of the projects
/// currently on the resolution stack; finding the dependency's directory
/// there means the local graph loops back on itself.
pub fn resolve(
    dep: &DependencyRecord,
    base: &Path,
    host: &dyn SubBuild,
    shell: &Shell,
    visited: &mut BTreeSet<PathBuf>,
) -> Result<ResolvedFlags, DependencyError> {
    let declared = dep.path.as_ref().ok_or_else(|| DependencyError::MissingField {
        dependency: dep.name.clone(),
        field: "path",
    })?;

    let dir = base.join(declared);
    let dir = dir.canonicalize().map_err(|source| DependencyError::Io {
        path: dir.clone(),
        source,
    })?;

    if visited.contains(&dir) {
        return Err(DependencyError::Cycle { path: dir });
    }

    shell.status(Status::Building, format!("local dependency `{}`", dep.name));
    host.rebuild(&dir, &dep.profiles, visited)
        .map_err(|source| DependencyError::Build {
            dependency: dep.name.clone(),
            source,
        })?;

    // Read the dependency's own layout to learn where its headers and build
    // outputs live.
    let dep_config = compose(&dep.profiles, &dir, shell)?;

    let mut flags = ResolvedFlags::default();
    for include in &dep_config.manifest.dirs.include {
        flags.add_include(&dir.join(include));
    }
    flags.add_lib_path(&dir.join(&dep_config.manifest.dirs.build));
    if dep.linkage.links() {
        flags.add_lib(dep_config.manifest.provided_name());
    }
    Ok(flags)
}
