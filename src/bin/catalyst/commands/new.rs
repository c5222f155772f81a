//! `catalyst new` command

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::NewArgs;
use catalyst::ops::{new_project, NewOptions};
use catalyst::util::Shell;

pub fn execute(args: NewArgs, shell: &Shell) -> Result<()> {
    let dest = args
        .path
        .clone()
        .unwrap_or_else(|| PathBuf::from(&args.name));
    let opts = NewOptions {
        name: args.name,
        lib: args.lib,
        init: false,
    };
    new_project(&dest, &opts, shell)
}
