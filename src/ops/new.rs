//! Implementation of `catalyst new` and `catalyst init`.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::config::CONSOLIDATED_FILE;
use crate::util::{Shell, Status};

/// Options for creating a new project.
#[derive(Debug, Clone)]
pub struct NewOptions {
    pub name: String,

    /// Scaffold a static library instead of an executable.
    pub lib: bool,

    /// Initialize into an existing directory.
    pub init: bool,
}

/// Create a new catalyst project.
pub fn new_project(path: &Path, opts: &NewOptions, shell: &Shell) -> Result<()> {
    if path.exists() && !opts.init {
        bail!(
            "destination `{}` already exists\n\
             \n\
             Use `catalyst init` to initialize an existing directory.",
            path.display()
        );
    }
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }

    let manifest_path = path.join(CONSOLIDATED_FILE);
    if manifest_path.exists() {
        bail!("`{CONSOLIDATED_FILE}` already exists in `{}`", path.display());
    }

    let kind = if opts.lib { "static-library" } else { "executable" };
    let manifest = format!(
        "common:\n  manifest:\n    name: {name}\n    type: {kind}\n    version: \"0.1.0\"\n\
         release:\n  manifest:\n    tooling:\n      CXXFLAGS: \"-O2\"\n",
        name = opts.name
    );
    fs::write(&manifest_path, manifest)
        .with_context(|| format!("failed to write {CONSOLIDATED_FILE}"))?;

    let src_dir = path.join("src");
    fs::create_dir_all(&src_dir).context("failed to create src directory")?;

    if opts.lib {
        let include_dir = path.join("include").join(&opts.name);
        fs::create_dir_all(&include_dir).context("failed to create include directory")?;

        let guard = header_guard(&opts.name);
        fs::write(
            include_dir.join(format!("{}.h", opts.name)),
            format!(
                "#ifndef {guard}\n#define {guard}\n\nvoid {name}_init(void);\n\n#endif /* {guard} */\n",
                name = opts.name
            ),
        )?;
        fs::write(
            src_dir.join(format!("{}.c", opts.name)),
            format!(
                "#include \"{name}/{name}.h\"\n\nvoid {name}_init(void) {{\n}}\n",
                name = opts.name
            ),
        )?;
    } else {
        fs::write(
            src_dir.join("main.cpp"),
            format!(
                "#include <cstdio>\n\nint main() {{\n    std::puts(\"hello from {}\");\n    return 0;\n}}\n",
                opts.name
            ),
        )?;
    }

    shell.status(
        Status::Created,
        format!("{kind} project `{}`", opts.name),
    );
    Ok(())
}

fn header_guard(name: &str) -> String {
    let mut guard: String = name
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    guard.push_str("_H");
    guard
}
