//! Makefile writer. Rule command templates become recipes with make's
//! automatic variables standing in for the graph placeholders.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;

use crate::graph::{BuildEdge, BuildWriter, GraphError, Rule};

#[derive(Debug, Default)]
pub struct MakeWriter {
    out: String,
    /// Rule name -> rewritten recipe and depfile template.
    rules: HashMap<String, (String, bool)>,
    depfiles: Vec<String>,
    default_goal: Option<String>,
}

impl MakeWriter {
    pub fn new() -> Self {
        MakeWriter::default()
    }
}

/// Rewrite graph placeholders into make syntax: `$in` -> `$^`, `$out` ->
/// `$@`, any other `$name` -> `$(name)`.
fn rewrite(template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '$' {
            out.push(ch);
            continue;
        }
        let mut name = String::new();
        while let Some(&next) = chars.peek() {
            if next.is_ascii_alphanumeric() || next == '_' {
                name.push(next);
                chars.next();
            } else {
                break;
            }
        }
        match name.as_str() {
            "" => out.push('$'),
            "in" => out.push_str("$^"),
            "out" => out.push_str("$@"),
            other => {
                out.push_str("$(");
                out.push_str(other);
                out.push(')');
            }
        }
    }
    out
}

fn escape(path: &Path) -> String {
    path.display().to_string().replace(' ', "\\ ")
}

impl BuildWriter for MakeWriter {
    fn add_comment(&mut self, text: &str) {
        let _ = writeln!(self.out, "# {text}");
    }

    fn add_variable(&mut self, name: &str, value: &str) {
        let _ = writeln!(self.out, "{name} = {value}");
    }

    fn add_rule(&mut self, rule: &Rule) -> Result<(), GraphError> {
        self.rules.insert(
            rule.name.clone(),
            (rewrite(&rule.command), rule.depfile.is_some()),
        );
        Ok(())
    }

    fn add_build(&mut self, edge: &BuildEdge) -> Result<(), GraphError> {
        let (recipe, has_depfile) = self
            .rules
            .get(&edge.rule)
            .cloned()
            .ok_or_else(|| GraphError::UnknownRule {
                name: edge.rule.clone(),
            })?;

        let outputs: Vec<String> = edge.outputs.iter().map(|p| escape(p)).collect();
        let inputs: Vec<String> = edge.inputs.iter().map(|p| escape(p)).collect();
        let _ = write!(self.out, "\n{}: {}", outputs.join(" "), inputs.join(" "));
        if !edge.implicit_deps.is_empty() {
            // Order-only, so `$^` keeps expanding to the explicit inputs.
            let implicit: Vec<String> = edge.implicit_deps.iter().map(|p| escape(p)).collect();
            let _ = write!(self.out, " | {}", implicit.join(" "));
        }
        self.out.push('\n');
        let _ = writeln!(self.out, "\t{recipe}");

        if has_depfile {
            for output in &outputs {
                self.depfiles.push(format!("{output}.d"));
            }
        }
        Ok(())
    }

    fn add_default(&mut self, target: &Path) {
        // First default wins, as in ninja.
        if self.default_goal.is_none() {
            self.default_goal = Some(escape(target));
        }
    }

    fn finish(&mut self) -> String {
        let mut out = std::mem::take(&mut self.out);
        if !self.depfiles.is_empty() {
            out.push('\n');
            let _ = writeln!(out, "-include {}", self.depfiles.join(" "));
        }
        if let Some(goal) = self.default_goal.take() {
            let _ = writeln!(out, "\n.DEFAULT_GOAL := {goal}");
        }
        self.rules.clear();
        self.depfiles.clear();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_rewrite_placeholders() {
        assert_eq!(
            rewrite("$cxx $cxxflags -MF $out.d -c $in -o $out"),
            "$(cxx) $(cxxflags) -MF $@.d -c $^ -o $@"
        );
    }

    #[test]
    fn test_edge_becomes_target_and_recipe() {
        let mut writer = MakeWriter::new();
        writer
            .add_rule(&Rule::new("binary_link", "$cxx $ldflags $in -o $out"))
            .unwrap();
        writer
            .add_build(&BuildEdge::new(
                "binary_link",
                vec![PathBuf::from("obj/main.o")],
                vec![PathBuf::from("bin/app")],
            ))
            .unwrap();
        writer.add_default(Path::new("bin/app"));
        let text = writer.finish();
        assert!(text.contains("bin/app: obj/main.o"));
        assert!(text.contains("\t$(cxx) $(ldflags) $^ -o $@"));
        assert!(text.contains(".DEFAULT_GOAL := bin/app"));
    }

    #[test]
    fn test_depfiles_are_included() {
        let mut writer = MakeWriter::new();
        writer
            .add_rule(&Rule::new("cc_compile", "$cc -c $in -o $out").depfile("$out.d"))
            .unwrap();
        writer
            .add_build(&BuildEdge::new(
                "cc_compile",
                vec![PathBuf::from("src/a.c")],
                vec![PathBuf::from("obj/a.o")],
            ))
            .unwrap();
        let text = writer.finish();
        assert!(text.contains("-include obj/a.o.d"));
    }

    #[test]
    fn test_implicit_deps_are_order_only() {
        let mut writer = MakeWriter::new();
        writer
            .add_rule(&Rule::new("cc_compile", "$cc -c $in -o $out"))
            .unwrap();
        writer
            .add_build(
                &BuildEdge::new(
                    "cc_compile",
                    vec![PathBuf::from("src/a.c")],
                    vec![PathBuf::from("obj/a.o")],
                )
                .implicit_deps(vec![PathBuf::from("gen/version.h")]),
            )
            .unwrap();
        let text = writer.finish();
        assert!(text.contains("obj/a.o: src/a.c | gen/version.h"));
    }

    #[test]
    fn test_unknown_rule_in_edge() {
        let mut writer = MakeWriter::new();
        let err = writer
            .add_build(&BuildEdge::new(
                "nope",
                vec![PathBuf::from("a")],
                vec![PathBuf::from("b")],
            ))
            .unwrap_err();
        assert!(matches!(err, GraphError::UnknownRule { .. }));
    }
}
