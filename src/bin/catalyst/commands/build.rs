//! `catalyst build` command

use std::path::Path;

use anyhow::Result;

use crate::cli::BuildArgs;
use catalyst::ops::{build, BuildOptions};
use catalyst::util::Shell;

pub fn to_options(args: &BuildArgs) -> BuildOptions {
    BuildOptions {
        profiles: args.generate.profiles.profiles.clone(),
        features: args.generate.features.clone(),
        backend: args.generate.backend,
        force_generate: args.force_generate,
    }
}

pub fn execute(root: &Path, args: BuildArgs, shell: &Shell) -> Result<()> {
    build(root, &to_options(&args), shell)
}
