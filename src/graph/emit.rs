//! Graph emission: configuration + features + resolved flags in, a renderable
//! [`BuildGraph`] out.

use std::path::{Path, PathBuf};

use crate::config::{Configuration, ProjectKind};
use crate::graph::sources::{discover_sources, language_of, Language};
use crate::graph::{BuildEdge, BuildGraph, FeatureSet, GraphError, Rule};
use crate::resolver::ResolvedFlags;

pub struct Emitter<'a> {
    /// Project directory; source dirs and outputs are relative to it.
    base: &'a Path,
}

impl<'a> Emitter<'a> {
    pub fn new(base: &'a Path) -> Self {
        Emitter { base }
    }

    /// Build the full graph for one generate call.
    pub fn plan(
        &self,
        config: &Configuration,
        features: &FeatureSet,
        resolved: &ResolvedFlags,
    ) -> Result<BuildGraph, GraphError> {
        let manifest = &config.manifest;
        let build_dir = &manifest.dirs.build;

        let mut graph = BuildGraph::default();
        graph.comments.push(format!(
            "generated by catalyst {} for `{}` - do not edit",
            env!("CARGO_PKG_VERSION"),
            manifest.name
        ));
        graph
            .comments
            .push(format!("profiles: {}", config.profiles.join(", ")));

        let defines = self.defines(config, features);
        let includes = self.include_flags(config);
        let (vcpkg_include, vcpkg_lib) = vcpkg_cache_flags(config);

        let mut ccflags = vec![manifest.tooling.ccflags.clone()];
        ccflags.extend(defines.iter().cloned());
        ccflags.extend(includes.iter().cloned());
        ccflags.extend(vcpkg_include.iter().cloned());
        ccflags.extend(resolved.ccflags.iter().cloned());

        let mut cxxflags = vec![manifest.tooling.cxxflags.clone()];
        cxxflags.extend(defines);
        cxxflags.extend(includes);
        cxxflags.extend(vcpkg_include);
        cxxflags.extend(resolved.cxxflags.iter().cloned());

        let mut ldflags = vcpkg_lib;
        ldflags.extend(resolved.ldflags.iter().cloned());

        graph.variables = vec![
            ("cc".to_string(), manifest.tooling.cc.clone()),
            ("cxx".to_string(), manifest.tooling.cxx.clone()),
            ("ar".to_string(), "ar".to_string()),
            ("ccflags".to_string(), join_clean(&ccflags)),
            ("cxxflags".to_string(), join_clean(&cxxflags)),
            ("ldflags".to_string(), join_clean(&ldflags)),
            ("ldlibs".to_string(), resolved.ldlibs.join(" ")),
            ("builddir".to_string(), build_dir.display().to_string()),
        ];

        graph.rules = rules();

        let sources = discover_sources(self.base, &manifest.dirs.source, &config.profiles)?;
        let mut objects = Vec::new();
        for source in &sources {
            let object = self.object_path(build_dir, source);
            let rule = match language_of(source) {
                Some(Language::C) => "cc_compile",
                _ => "cxx_compile",
            };
            graph
                .edges
                .push(BuildEdge::new(rule, vec![source.clone()], vec![object.clone()]));
            objects.push(object);
        }

        if let Some((rule, output)) = link_target(manifest.kind, &manifest.name, build_dir) {
            graph
                .edges
                .push(BuildEdge::new(rule, objects, vec![output.clone()]));
            graph.defaults.push(output);
        }

        Ok(graph)
    }

    /// Synthetic and feature defines, in declaration order.
    fn defines(&self, config: &Configuration, features: &FeatureSet) -> Vec<String> {
        let manifest = &config.manifest;
        let mut defines = vec![
            "-DCATALYST_BUILD=1".to_string(),
            format!("-DCATALYST_NAME=\\\"{}\\\"", manifest.name),
            format!("-DCATALYST_VERSION=\\\"{}\\\"", manifest.version),
        ];
        let project = identifier(&manifest.name);
        for (name, default) in config.feature_decls() {
            let value = if features.state(&name, default) { 1 } else { 0 };
            defines.push(format!("-D{}_{}={}", project, identifier(&name), value));
        }
        defines
    }

    fn include_flags(&self, config: &Configuration) -> Vec<String> {
        config
            .manifest
            .dirs
            .include
            .iter()
            .map(|dir| format!("-I{}", dir.display()))
            .collect()
    }

    /// `<build>/obj/<path-relative-to-base>.o`
    fn object_path(&self, build_dir: &Path, source: &Path) -> PathBuf {
        let rel = source.strip_prefix(self.base).unwrap_or(source);
        let mut object = build_dir.join("obj").join(rel);
        let file = object
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        object.set_file_name(format!("{file}.o"));
        object
    }
}

fn rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "cxx_compile",
            "$cxx $cxxflags -MD -MF $out.d -c $in -o $out",
        )
        .depfile("$out.d")
        .dep_format("gcc")
        .description("CXX $out"),
        Rule::new("cc_compile", "$cc $ccflags -MD -MF $out.d -c $in -o $out")
            .depfile("$out.d")
            .dep_format("gcc")
            .description("CC $out"),
        Rule::new("binary_link", "$cxx $ldflags $in -o $out $ldlibs")
            .description("LINK $out"),
        Rule::new("static_link", "$ar rcs $out $in").description("AR $out"),
        Rule::new(
            "shared_link",
            "$cxx -shared -fPIC $ldflags $in -o $out $ldlibs",
        )
        .description("SHLIB $out"),
    ]
}

/// Link rule and output path for the project kind; `None` for header-only.
fn link_target(kind: ProjectKind, name: &str, build_dir: &Path) -> Option<(&'static str, PathBuf)> {
    match kind {
        ProjectKind::Executable => Some(("binary_link", build_dir.join(name))),
        ProjectKind::StaticLibrary => {
            Some(("static_link", build_dir.join(format!("lib{name}.a"))))
        }
        ProjectKind::SharedLibrary => Some((
            "shared_link",
            build_dir.join(format!("lib{name}{}", shared_ext())),
        )),
        ProjectKind::HeaderOnly => None,
    }
}

/// Link output relative to the project root, `None` for header-only projects.
pub fn artifact_path(manifest: &crate::config::Manifest) -> Option<PathBuf> {
    link_target(manifest.kind, &manifest.name, &manifest.dirs.build).map(|(_, path)| path)
}

fn shared_ext() -> &'static str {
    if cfg!(target_os = "macos") {
        ".dylib"
    } else if cfg!(target_os = "windows") {
        ".dll"
    } else {
        ".so"
    }
}

/// The vcpkg cache's shared include/lib dirs, when the cache is configured.
fn vcpkg_cache_flags(config: &Configuration) -> (Vec<String>, Vec<String>) {
    let Some(root) = crate::resolver::vcpkg_root() else {
        return (Vec::new(), Vec::new());
    };
    let triplet = config
        .dependencies
        .iter()
        .find_map(|dep| dep.triplet.clone())
        .unwrap_or_else(|| crate::resolver::default_triplet().to_string());
    let installed = root.join("installed").join(triplet);
    (
        vec![format!("-I{}", installed.join("include").display())],
        vec![format!("-L{}", installed.join("lib").display())],
    )
}

/// Uppercase C identifier derived from a project or feature name.
fn identifier(name: &str) -> String {
    name.chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

fn join_clean(parts: &[String]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
