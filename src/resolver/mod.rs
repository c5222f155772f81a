//! Dependency resolution.
//!
//! The resolver turns declared dependency records into the compiler and
//! linker flags the build graph needs. Every source kind resolves to flags
//! only; fetching (git clones, workspace symlinks) is the fetch pipeline's
//! job. Resolution is sequential and aborts on the first failure - a partial
//! flag set is never returned.

mod git;
mod local;
mod system;
mod vcpkg;

pub use vcpkg::{default_triplet, vcpkg_root};

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{ConfigError, Configuration, DependencyRecord, SourceKind};
use crate::util::{Shell, Status};
use crate::workspace::Workspace;

/// Directory under the build dir where fetched dependencies live.
pub const LIBS_DIR: &str = "catalyst-libs";

#[derive(Debug, Error)]
pub enum DependencyError {
    #[error("dependency `{dependency}` is missing required field `{field}`")]
    MissingField {
        dependency: String,
        field: &'static str,
    },

    #[error("dependency `{dependency}` requires the `{var}` environment variable")]
    MissingEnv {
        dependency: String,
        var: &'static str,
    },

    #[error("dependency cycle detected involving {}", path.display())]
    Cycle { path: PathBuf },

    #[error("failed to build dependency `{dependency}`")]
    Build {
        dependency: String,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Compiler and linker flags produced by resolution. Ephemeral - recomputed
/// on every generate call, never written to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFlags {
    pub cxxflags: Vec<String>,
    pub ccflags: Vec<String>,
    pub ldflags: Vec<String>,
    pub ldlibs: Vec<String>,
}

impl ResolvedFlags {
    /// `-I<dir>` for both compilers.
    pub fn add_include(&mut self, dir: &Path) {
        let flag = format!("-I{}", dir.display());
        self.cxxflags.push(flag.clone());
        self.ccflags.push(flag);
    }

    /// `-L<dir>`.
    pub fn add_lib_path(&mut self, dir: &Path) {
        self.ldflags.push(format!("-L{}", dir.display()));
    }

    /// `-l<name>`.
    pub fn add_lib(&mut self, name: &str) {
        self.ldlibs.push(format!("-l{name}"));
    }

    pub fn extend(&mut self, other: ResolvedFlags) {
        self.cxxflags.extend(other.cxxflags);
        self.ccflags.extend(other.ccflags);
        self.ldflags.extend(other.ldflags);
        self.ldlibs.extend(other.ldlibs);
    }
}

/// Host hook for nested rebuilds of local dependencies. The build op
/// implements this; tests substitute a stub.
pub trait SubBuild {
    /// Fully rebuild the project at `dir` with the given profiles, threading
    /// the visited set through for cycle detection.
    fn rebuild(
        &self,
        dir: &Path,
        profiles: &[String],
        visited: &mut BTreeSet<PathBuf>,
    ) -> anyhow::Result<()>;
}

/// Resolves a configuration's dependency list into flags.
pub struct Resolver<'a> {
    /// Project directory all relative dependency paths resolve against.
    base: &'a Path,
    /// The project's build directory (clone layout lives under it).
    build_dir: PathBuf,
    workspace: Option<&'a Workspace>,
    host: &'a dyn SubBuild,
    shell: &'a Shell,
}

impl<'a> Resolver<'a> {
    pub fn new(
        base: &'a Path,
        build_dir: PathBuf,
        workspace: Option<&'a Workspace>,
        host: &'a dyn SubBuild,
        shell: &'a Shell,
    ) -> Self {
        Resolver {
            base,
            build_dir,
            workspace,
            host,
            shell,
        }
    }

    /// Resolve every dependency of `config` into one combined flag set.
    ///
    /// `visited` holds the canonical directories of the projects currently
    /// being resolved (ancestors only). This project's directory is inserted
    /// on entry and removed on exit, so sibling dependencies on the same
    /// path do not trip the cycle check.
    pub fn resolve(
        &self,
        config: &Configuration,
        visited: &mut BTreeSet<PathBuf>,
    ) -> Result<ResolvedFlags, DependencyError> {
        let base = canonical(self.base)?;
        let inserted = visited.insert(base.clone());
        let result = self.resolve_all(config, visited);
        if inserted {
            visited.remove(&base);
        }
        result
    }

    fn resolve_all(
        &self,
        config: &Configuration,
        visited: &mut BTreeSet<PathBuf>,
    ) -> Result<ResolvedFlags, DependencyError> {
        let mut flags = ResolvedFlags::default();
        for dep in &config.dependencies {
            self.shell
                .status(Status::Resolving, format!("{} ({})", dep.name, dep.source));
            flags.extend(self.resolve_one(dep, visited)?);
        }
        Ok(flags)
    }

    fn resolve_one(
        &self,
        dep: &DependencyRecord,
        visited: &mut BTreeSet<PathBuf>,
    ) -> Result<ResolvedFlags, DependencyError> {
        // A name matching a workspace sibling wins over the declared source:
        // refresh the symlink into the clone layout and emit clone flags.
        if let Some(member_dir) = self
            .workspace
            .and_then(|ws| ws.member_path(&dep.name))
        {
            return self.resolve_sibling(dep, &member_dir);
        }

        let mut flags = match dep.source {
            SourceKind::Local => {
                return local::resolve(dep, self.base, self.host, self.shell, visited);
            }
            SourceKind::System => system::resolve(dep, self.shell)?,
            SourceKind::Vcpkg => vcpkg::resolve(dep)?,
            SourceKind::Git => git::resolve(dep, &self.build_dir),
            SourceKind::Fallback => {
                self.shell
                    .warn(format!("dependency `{}` has an unrecognized source", dep.name));
                system::resolve(dep, self.shell)?
            }
        };

        for extra in &dep.using {
            flags.add_lib(extra);
        }
        Ok(flags)
    }

    fn resolve_sibling(
        &self,
        dep: &DependencyRecord,
        member_dir: &Path,
    ) -> Result<ResolvedFlags, DependencyError> {
        let link = self.build_dir.join(LIBS_DIR).join(&dep.name);
        if crate::util::fs::refresh_symlink(member_dir, &link)? {
            self.shell.status(
                Status::Linking,
                format!("{} -> {}", dep.name, member_dir.display()),
            );
        }

        let mut flags = git::clone_layout_flags(dep, &link);
        for extra in &dep.using {
            flags.add_lib(extra);
        }
        Ok(flags)
    }
}

fn canonical(path: &Path) -> Result<PathBuf, DependencyError> {
    path.canonicalize().map_err(|source| DependencyError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
pub(crate) struct NoRebuild;

#[cfg(test)]
impl SubBuild for NoRebuild {
    fn rebuild(
        &self,
        _dir: &Path,
        _profiles: &[String],
        _visited: &mut BTreeSet<PathBuf>,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}
