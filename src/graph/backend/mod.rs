//! Graph rendering backends.
//!
//! Every backend implements the same five-call protocol; the graph replays
//! itself through it and the writer accumulates the file text.

mod make;
mod minimal;
mod ninja;

pub use make::MakeWriter;
pub use minimal::MinimalWriter;
pub use ninja::NinjaWriter;

use std::path::Path;

use crate::config::Generator;
use crate::graph::{BuildEdge, GraphError, Rule};

/// Sink for graph statements. Calls arrive in declaration order; `finish`
/// yields the rendered file.
pub trait BuildWriter {
    fn add_comment(&mut self, text: &str);
    fn add_variable(&mut self, name: &str, value: &str);
    fn add_rule(&mut self, rule: &Rule) -> Result<(), GraphError>;
    fn add_build(&mut self, edge: &BuildEdge) -> Result<(), GraphError>;
    fn add_default(&mut self, target: &Path);
    fn finish(&mut self) -> String;
}

/// Which backend a generate call renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BackendKind {
    Ninja,
    Make,
    Minimal,
}

impl BackendKind {
    /// File the rendered graph is written to, inside the build directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            BackendKind::Ninja => "build.ninja",
            BackendKind::Make => "Makefile",
            BackendKind::Minimal => "build.plan",
        }
    }

    /// External executor program, if the backend has one.
    pub fn executor(&self) -> Option<&'static str> {
        match self {
            BackendKind::Ninja => Some("ninja"),
            BackendKind::Make => Some("make"),
            BackendKind::Minimal => None,
        }
    }

    pub fn writer(&self) -> Box<dyn BuildWriter> {
        match self {
            BackendKind::Ninja => Box::new(NinjaWriter::new()),
            BackendKind::Make => Box::new(MakeWriter::new()),
            BackendKind::Minimal => Box::new(MinimalWriter::new()),
        }
    }
}

impl From<Generator> for BackendKind {
    fn from(generator: Generator) -> Self {
        match generator {
            Generator::Ninja => BackendKind::Ninja,
            Generator::Minimal => BackendKind::Minimal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::BuildGraph;
    use std::path::PathBuf;

    /// Two variables, two rules, three edges (one multi-output) - the shape
    /// shared by the per-backend equivalence tests.
    pub(super) fn sample_graph() -> BuildGraph {
        let mut graph = BuildGraph::default();
        graph.comments.push("generated".to_string());
        graph
            .variables
            .push(("cxx".to_string(), "c++".to_string()));
        graph
            .variables
            .push(("cxxflags".to_string(), "-O2 -Wall".to_string()));
        graph.rules.push(
            Rule::new("cxx_compile", "$cxx $cxxflags -c $in -o $out").depfile("$out.d"),
        );
        graph
            .rules
            .push(Rule::new("binary_link", "$cxx $in -o $out"));
        graph.edges.push(BuildEdge::new(
            "cxx_compile",
            vec![PathBuf::from("src/main.cpp")],
            vec![PathBuf::from("build/obj/main.o")],
        ));
        graph.edges.push(BuildEdge::new(
            "cxx_compile",
            vec![PathBuf::from("src/util.cpp")],
            vec![
                PathBuf::from("build/obj/util.o"),
                PathBuf::from("build/obj/util.meta"),
            ],
        ));
        graph.edges.push(BuildEdge::new(
            "binary_link",
            vec![
                PathBuf::from("build/obj/main.o"),
                PathBuf::from("build/obj/util.o"),
            ],
            vec![PathBuf::from("build/app")],
        ));
        graph.defaults.push(PathBuf::from("build/app"));
        graph
    }

    #[test]
    fn test_full_backends_render_the_sample_graph() {
        let graph = sample_graph();
        for kind in [BackendKind::Ninja, BackendKind::Make] {
            let mut writer = kind.writer();
            graph.render(writer.as_mut()).unwrap();
            let text = writer.finish();
            assert!(text.contains("build/app"), "{kind:?} lost the link target");
        }
    }

    #[test]
    fn test_minimal_rejects_only_the_multi_output_edge() {
        let graph = sample_graph();
        let mut writer = MinimalWriter::new();

        // Everything except the second edge goes through.
        for comment in &graph.comments {
            writer.add_comment(comment);
        }
        for (name, value) in &graph.variables {
            writer.add_variable(name, value);
        }
        for rule in &graph.rules {
            writer.add_rule(rule).unwrap();
        }
        writer.add_build(&graph.edges[0]).unwrap();
        let err = writer.add_build(&graph.edges[1]).unwrap_err();
        assert!(matches!(err, GraphError::MultipleOutputs { .. }));
        writer.add_build(&graph.edges[2]).unwrap();
    }

    #[test]
    fn test_backend_from_generator() {
        assert_eq!(BackendKind::from(Generator::Ninja), BackendKind::Ninja);
        assert_eq!(BackendKind::from(Generator::Minimal), BackendKind::Minimal);
    }
}
