//! `catalyst run` command

use std::path::Path;

use anyhow::Result;

use crate::cli::RunArgs;
use catalyst::ops::{run, RunOptions};
use catalyst::util::Shell;

pub fn to_options(args: &RunArgs) -> RunOptions {
    RunOptions {
        build: super::build::to_options(&args.build),
        args: args.args.clone(),
    }
}

pub fn execute(root: &Path, args: RunArgs, shell: &Shell) -> Result<()> {
    run(root, &to_options(&args), shell)
}
