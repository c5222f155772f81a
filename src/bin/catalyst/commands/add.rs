//! `catalyst add` command

use std::path::Path;

use anyhow::Result;

use crate::cli::AddArgs;
use catalyst::config::{DependencyRecord, Linkage, SourceKind};
use catalyst::ops::{add, AddOptions};
use catalyst::util::Shell;

pub fn execute(root: &Path, args: AddArgs, shell: &Shell) -> Result<()> {
    // Unrecognized kinds are kept as declared; they resolve best-effort.
    let source: SourceKind =
        serde_yaml::from_str(&args.source).unwrap_or(SourceKind::Fallback);
    if source == SourceKind::Fallback {
        shell.warn(format!("unrecognized source kind `{}`", args.source));
    }

    let mut record = DependencyRecord::new(args.name, source);
    record.version = args.version;
    record.branch = args.branch;
    record.url = args.url;
    record.path = args.path;
    record.include = args.include;
    record.lib = args.lib;
    record.triplet = args.triplet;
    record.using = args.using;
    if args.header_only {
        record.linkage = Linkage::HeaderOnly;
    }

    let opts = AddOptions {
        record,
        profile: args.profile,
    };
    add(root, &opts, shell)
}
