//! `catalyst generate` command

use std::path::Path;

use anyhow::Result;

use crate::cli::GenerateArgs;
use catalyst::ops::{generate, GenerateOptions};
use catalyst::util::Shell;

pub fn execute(root: &Path, args: GenerateArgs, shell: &Shell) -> Result<()> {
    let opts = GenerateOptions {
        profiles: args.profiles.profiles,
        features: args.features,
        backend: args.backend,
    };
    generate(root, &opts, shell)?;
    Ok(())
}
