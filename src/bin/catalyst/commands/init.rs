//! `catalyst init` command

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::InitArgs;
use catalyst::ops::{new_project, NewOptions};
use catalyst::util::Shell;

pub fn execute(root: &Path, args: InitArgs, shell: &Shell) -> Result<()> {
    let name = match args.name {
        Some(name) => name,
        None => root
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .context("cannot derive a project name from the directory; pass --name")?,
    };
    let opts = NewOptions {
        name,
        lib: args.lib,
        init: true,
    };
    new_project(root, &opts, shell)
}
