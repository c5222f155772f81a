//! Ninja file writer. The graph model is close to ninja's own, so this is a
//! near-literal serialization plus path escaping.

use std::fmt::Write as _;
use std::path::Path;

use crate::graph::{BuildEdge, BuildWriter, GraphError, Rule};

#[derive(Debug, Default)]
pub struct NinjaWriter {
    out: String,
}

impl NinjaWriter {
    pub fn new() -> Self {
        NinjaWriter::default()
    }
}

/// Escape the characters ninja treats specially in paths.
fn escape(path: &Path) -> String {
    let raw = path.display().to_string();
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '$' => escaped.push_str("$$"),
            ' ' => escaped.push_str("$ "),
            ':' => escaped.push_str("$:"),
            '\n' => escaped.push_str("$\n"),
            other => escaped.push(other),
        }
    }
    escaped
}

impl BuildWriter for NinjaWriter {
    fn add_comment(&mut self, text: &str) {
        let _ = writeln!(self.out, "# {text}");
    }

    fn add_variable(&mut self, name: &str, value: &str) {
        let _ = writeln!(self.out, "{name} = {value}");
    }

    fn add_rule(&mut self, rule: &Rule) -> Result<(), GraphError> {
        let _ = writeln!(self.out, "\nrule {}", rule.name);
        let _ = writeln!(self.out, "  command = {}", rule.command);
        if let Some(depfile) = &rule.depfile {
            let _ = writeln!(self.out, "  depfile = {depfile}");
        }
        if let Some(format) = &rule.dep_format {
            let _ = writeln!(self.out, "  deps = {format}");
        }
        if let Some(description) = &rule.description {
            let _ = writeln!(self.out, "  description = {description}");
        }
        Ok(())
    }

    fn add_build(&mut self, edge: &BuildEdge) -> Result<(), GraphError> {
        let outputs: Vec<String> = edge.outputs.iter().map(|p| escape(p)).collect();
        let inputs: Vec<String> = edge.inputs.iter().map(|p| escape(p)).collect();
        let _ = write!(
            self.out,
            "build {}: {} {}",
            outputs.join(" "),
            edge.rule,
            inputs.join(" ")
        );
        if !edge.implicit_deps.is_empty() {
            let implicit: Vec<String> = edge.implicit_deps.iter().map(|p| escape(p)).collect();
            let _ = write!(self.out, " | {}", implicit.join(" "));
        }
        self.out.push('\n');
        Ok(())
    }

    fn add_default(&mut self, target: &Path) {
        let _ = writeln!(self.out, "default {}", escape(target));
    }

    fn finish(&mut self) -> String {
        std::mem::take(&mut self.out)
    }
}
