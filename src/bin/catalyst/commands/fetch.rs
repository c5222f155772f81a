//! `catalyst fetch` command

use std::path::Path;

use anyhow::Result;

use crate::cli::FetchArgs;
use catalyst::ops::{fetch, FetchOptions};
use catalyst::util::Shell;

pub fn execute(root: &Path, args: FetchArgs, shell: &Shell) -> Result<()> {
    let opts = FetchOptions {
        profiles: args.profiles.profiles,
        force: args.force,
    };
    fetch(root, &opts, shell)
}
