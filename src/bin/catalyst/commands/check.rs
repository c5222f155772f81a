//! `catalyst check` command

use std::path::Path;

use anyhow::Result;

use crate::cli::CheckArgs;
use catalyst::ops::{check, CheckOptions};
use catalyst::util::Shell;

pub fn execute(root: &Path, args: CheckArgs, shell: &Shell) -> Result<()> {
    let opts = CheckOptions {
        profiles: args.profiles.profiles,
        format: args.format,
        jobs: args.jobs,
    };
    check(root, &opts, shell)
}
