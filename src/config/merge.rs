//! Layered deep-merge over YAML value trees.
//!
//! Merge semantics, applied one profile layer at a time over the running
//! composite:
//! - scalar over scalar: later wins; overriding a value an earlier layer set
//!   draws a silent-override warning
//! - explicit null deletes the key
//! - sequences concatenate, later entries appended
//! - mappings recurse key-by-key
//! - `meta.min_ver` merges via numeric max over dotted triples
//! - `meta.generator` is validated against the known backends
//! - `hooks.*` wrap scalars into one-element sequences and append

use serde_yaml::{Mapping, Value};

use crate::config::RECOGNIZED_HOOKS;
use crate::util::Shell;

/// Generator tokens `meta.generator` accepts.
const GENERATORS: &[&str] = &["ninja", "minimal"];
const GENERATOR_FALLBACK: &str = "ninja";

struct MergeCx<'a> {
    defaults: &'a Value,
    profile: &'a str,
    shell: &'a Shell,
}

/// Merge one profile document into the running composite.
///
/// Never fails: every conflict is either resolved by the rules above or
/// reported as a non-fatal diagnostic through the shell.
pub fn merge_document(
    composite: &mut Value,
    incoming: Value,
    defaults: &Value,
    profile: &str,
    shell: &Shell,
) {
    let cx = MergeCx {
        defaults,
        profile,
        shell,
    };
    let mut path = Vec::new();
    merge_nodes(composite, incoming, &mut path, &cx);
}

fn merge_nodes(dest: &mut Value, incoming: Value, path: &mut Vec<String>, cx: &MergeCx<'_>) {
    // Special-cased leaves take priority over the structural rules.
    if path_is(path, &["meta", "min_ver"]) {
        merge_min_ver(dest, &incoming, cx);
        return;
    }
    if path_is(path, &["meta", "generator"]) {
        merge_generator(dest, &incoming, cx);
        return;
    }
    if path.len() == 2 && path[0] == "hooks" {
        merge_hook(dest, incoming);
        return;
    }

    match (dest, incoming) {
        (Value::Mapping(dest_map), Value::Mapping(incoming_map)) => {
            merge_mappings(dest_map, incoming_map, path, cx);
        }
        (Value::Sequence(dest_seq), Value::Sequence(mut incoming_seq)) => {
            dest_seq.append(&mut incoming_seq);
        }
        (dest_other, incoming_other) => {
            override_scalar(dest_other, incoming_other, path, cx);
        }
    }
}

fn merge_mappings(
    dest: &mut Mapping,
    incoming: Mapping,
    path: &mut Vec<String>,
    cx: &MergeCx<'_>,
) {
    for (key, value) in incoming {
        let key_text = key
            .as_str()
            .map(str::to_owned)
            .unwrap_or_else(|| format!("{:?}", key));

        // Explicit null deletes; a null for an absent key is a no-op.
        if value.is_null() {
            dest.remove(&key);
            continue;
        }

        if path.len() == 1 && path[0] == "hooks" && !RECOGNIZED_HOOKS.contains(&key_text.as_str())
        {
            cx.shell.warn(format!(
                "profile `{}` declares unrecognized hook `{}`",
                cx.profile, key_text
            ));
        }

        path.push(key_text);
        match dest.get_mut(&key) {
            Some(existing) => merge_nodes(existing, value, path, cx),
            None => {
                // Hook entries are normalized to sequences even on first
                // insertion so every layer appends uniformly.
                let value = if path.len() == 2 && path[0] == "hooks" {
                    wrap_sequence(value)
                } else {
                    value
                };
                dest.insert(key.clone(), value);
            }
        }
        path.pop();
    }
}

fn override_scalar(dest: &mut Value, incoming: Value, path: &[String], cx: &MergeCx<'_>) {
    if *dest == incoming {
        return;
    }

    let default = default_at(cx.defaults, path);
    let dest_is_default = default.map(|d| d == dest).unwrap_or(false);
    let incoming_is_default = default.map(|d| d == &incoming).unwrap_or(false);

    // Warn only when an earlier layer's explicit choice is being replaced by
    // yet another non-default value.
    if !dest_is_default && !incoming_is_default {
        cx.shell.warn(format!(
            "profile `{}` silently overrides `{}` ({} -> {})",
            cx.profile,
            path.join("."),
            render_scalar(dest),
            render_scalar(&incoming),
        ));
    }

    *dest = incoming;
}

/// `meta.min_ver`: keep the numerically larger dotted triple.
/// Missing or non-numeric components count as zero.
fn merge_min_ver(dest: &mut Value, incoming: &Value, cx: &MergeCx<'_>) {
    let current = dest.as_str().unwrap_or("0");
    let Some(candidate) = incoming.as_str() else {
        cx.shell.warn(format!(
            "profile `{}`: meta.min_ver must be a string, ignoring",
            cx.profile
        ));
        return;
    };

    if parse_triple(candidate) > parse_triple(current) {
        *dest = Value::String(candidate.to_string());
    }
}

fn merge_generator(dest: &mut Value, incoming: &Value, cx: &MergeCx<'_>) {
    match incoming.as_str() {
        Some(generator) if GENERATORS.contains(&generator) => {
            *dest = Value::String(generator.to_string());
        }
        other => {
            let shown = other
                .map(str::to_owned)
                .unwrap_or_else(|| format!("{:?}", incoming));
            cx.shell.warn(format!(
                "profile `{}`: unknown generator `{}`, keeping `{}`",
                cx.profile, shown, GENERATOR_FALLBACK
            ));
        }
    }
}

/// Hooks merge per hook name: both sides normalize to sequences, then append.
fn merge_hook(dest: &mut Value, incoming: Value) {
    let mut merged = match std::mem::take(dest) {
        Value::Sequence(seq) => seq,
        Value::Null => Vec::new(),
        scalar => vec![scalar],
    };
    match incoming {
        Value::Sequence(mut seq) => merged.append(&mut seq),
        scalar => merged.push(scalar),
    }
    *dest = Value::Sequence(merged);
}

fn wrap_sequence(value: Value) -> Value {
    match value {
        Value::Sequence(_) => value,
        scalar => Value::Sequence(vec![scalar]),
    }
}

/// Parse up to three dotted components; anything unparseable is zero.
pub fn parse_triple(version: &str) -> (u64, u64, u64) {
    let mut parts = version
        .split('.')
        .map(|part| part.trim().parse::<u64>().unwrap_or(0));
    (
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
    )
}

fn path_is(path: &[String], expected: &[&str]) -> bool {
    path.len() == expected.len() && path.iter().zip(expected).all(|(a, b)| a == b)
}

fn default_at<'a>(defaults: &'a Value, path: &[String]) -> Option<&'a Value> {
    let mut node = defaults;
    for segment in path {
        node = node.get(segment.as_str())?;
    }
    Some(node)
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => format!("`{s}`"),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|_| format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::default_document;

    fn merge_layers(layers: &[&str]) -> (Value, usize) {
        let defaults = default_document();
        let mut composite = defaults.clone();
        let shell = Shell::silent();
        for (i, layer) in layers.iter().enumerate() {
            let doc: Value = serde_yaml::from_str(layer).unwrap();
            merge_document(&mut composite, doc, &defaults, &format!("layer{i}"), &shell);
        }
        (composite, shell.warning_count())
    }

    #[test]
    fn test_scalar_later_wins_order_sensitive() {
        let a = "manifest: { name: alpha }";
        let b = "manifest: { name: beta }";

        let (ab, _) = merge_layers(&[a, b]);
        assert_eq!(ab["manifest"]["name"].as_str(), Some("beta"));

        let (ba, _) = merge_layers(&[b, a]);
        assert_eq!(ba["manifest"]["name"].as_str(), Some("alpha"));
    }

    #[test]
    fn test_silent_override_warns_once() {
        // First layer customizes away from the default, second overrides it:
        // only the second merge is a silent override.
        let (_, warnings) = merge_layers(&[
            "manifest: { name: alpha }",
            "manifest: { name: beta }",
        ]);
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_null_deletes_key() {
        let (merged, _) = merge_layers(&[
            "manifest: { provides: libfoo }",
            "manifest: { provides: null }",
        ]);
        assert!(merged["manifest"].get("provides").is_none());
    }

    #[test]
    fn test_null_for_absent_key_is_noop() {
        let (merged, _) = merge_layers(&["manifest: { provides: null }"]);
        assert!(merged["manifest"].get("provides").is_none());
    }

    #[test]
    fn test_sequences_append_in_order_without_dedup() {
        let (merged, _) = merge_layers(&["features: [f1]", "features: [f2, f1]"]);
        let features: Vec<&str> = merged["features"]
            .as_sequence()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(features, vec!["f1", "f2", "f1"]);
    }

    #[test]
    fn test_min_ver_numeric_max_not_lexicographic() {
        let (merged, _) = merge_layers(&[
            "meta: { min_ver: \"1.2.0\" }",
            "meta: { min_ver: \"1.10.0\" }",
        ]);
        assert_eq!(merged["meta"]["min_ver"].as_str(), Some("1.10.0"));

        // Reversed order keeps the max too.
        let (merged, _) = merge_layers(&[
            "meta: { min_ver: \"1.10.0\" }",
            "meta: { min_ver: \"1.2.0\" }",
        ]);
        assert_eq!(merged["meta"]["min_ver"].as_str(), Some("1.10.0"));
    }

    #[test]
    fn test_parse_triple_tolerates_junk() {
        assert_eq!(parse_triple("1.2.3"), (1, 2, 3));
        assert_eq!(parse_triple("2"), (2, 0, 0));
        assert_eq!(parse_triple("1.x.5"), (1, 0, 5));
        assert_eq!(parse_triple(""), (0, 0, 0));
    }

    #[test]
    fn test_invalid_generator_warns_and_keeps_default() {
        let (merged, warnings) = merge_layers(&["meta: { generator: scons }"]);
        assert_eq!(merged["meta"]["generator"].as_str(), Some("ninja"));
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_valid_generator_applies() {
        let (merged, _) = merge_layers(&["meta: { generator: minimal }"]);
        assert_eq!(merged["meta"]["generator"].as_str(), Some("minimal"));
    }

    #[test]
    fn test_hooks_wrap_scalars_and_append() {
        let (merged, _) = merge_layers(&[
            "hooks: { pre-build: \"echo one\" }",
            "hooks: { pre-build: [\"echo two\", \"echo three\"] }",
        ]);
        let hook: Vec<&str> = merged["hooks"]["pre-build"]
            .as_sequence()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(hook, vec!["echo one", "echo two", "echo three"]);
    }

    #[test]
    fn test_unrecognized_hook_warns() {
        let (_, warnings) = merge_layers(&["hooks: { pre-lunch: \"echo hi\" }"]);
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_maps_recurse_key_by_key() {
        let (merged, _) = merge_layers(&[
            "manifest: { tooling: { CC: gcc } }",
            "manifest: { tooling: { CXX: g++ } }",
        ]);
        assert_eq!(merged["manifest"]["tooling"]["CC"].as_str(), Some("gcc"));
        assert_eq!(merged["manifest"]["tooling"]["CXX"].as_str(), Some("g++"));
    }
}
