//! `catalyst clean` command

use std::path::Path;

use anyhow::Result;

use crate::cli::ProfileArgs;
use catalyst::ops::{clean, CleanOptions};
use catalyst::util::Shell;

pub fn execute(root: &Path, args: ProfileArgs, shell: &Shell) -> Result<()> {
    let opts = CleanOptions {
        profiles: args.profiles,
    };
    clean(root, &opts, shell)
}
