//! Minimal plan writer: a line-oriented format for tooling that wants the
//! graph without a real build system. Rule names map to a closed set of
//! single-letter tags and every edge carries exactly one output.

use std::fmt::Write as _;
use std::path::Path;

use crate::graph::{BuildEdge, BuildWriter, GraphError, Rule};

const TAGS: &[(&str, char)] = &[
    ("cxx_compile", 'X'),
    ("cc_compile", 'C'),
    ("binary_link", 'B'),
    ("static_link", 'S'),
    ("shared_link", 'D'),
];

fn tag(rule: &str) -> Result<char, GraphError> {
    TAGS.iter()
        .find(|(name, _)| *name == rule)
        .map(|(_, tag)| *tag)
        .ok_or_else(|| GraphError::UnknownRule {
            name: rule.to_string(),
        })
}

#[derive(Debug, Default)]
pub struct MinimalWriter {
    out: String,
}

impl MinimalWriter {
    pub fn new() -> Self {
        MinimalWriter::default()
    }
}

impl BuildWriter for MinimalWriter {
    fn add_comment(&mut self, text: &str) {
        let _ = writeln!(self.out, "# {text}");
    }

    fn add_variable(&mut self, name: &str, value: &str) {
        let _ = writeln!(self.out, "var {name} {value}");
    }

    fn add_rule(&mut self, rule: &Rule) -> Result<(), GraphError> {
        // Commands are implied by the tag; the rule only has to be known.
        tag(&rule.name).map(|_| ())
    }

    fn add_build(&mut self, edge: &BuildEdge) -> Result<(), GraphError> {
        let tag = tag(&edge.rule)?;
        let [output] = edge.outputs.as_slice() else {
            return Err(GraphError::MultipleOutputs {
                rule: edge.rule.clone(),
                outputs: edge
                    .outputs
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect(),
            });
        };

        let _ = write!(self.out, "{tag} {}", output.display());
        // The plan format has no implicit/explicit distinction; fold both in.
        for input in edge.inputs.iter().chain(&edge.implicit_deps) {
            let _ = write!(self.out, " {}", input.display());
        }
        self.out.push('\n');
        Ok(())
    }

    fn add_default(&mut self, _target: &Path) {
        // The plan format has no default-target concept.
    }

    fn finish(&mut self) -> String {
        std::mem::take(&mut self.out)
    }
}
