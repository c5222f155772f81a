//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell as CompletionShell;

use catalyst::graph::BackendKind;

/// Catalyst - a declarative, profile-layered build tool for C and C++
#[derive(Parser)]
#[command(name = "catalyst")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Color output: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    pub color: String,

    /// Run as if started in this directory
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new catalyst project
    New(NewArgs),

    /// Initialize a catalyst project in an existing directory
    Init(InitArgs),

    /// Write the build graph file for the composed profiles
    Generate(GenerateArgs),

    /// Fetch git dependencies and refresh workspace links
    Fetch(FetchArgs),

    /// Build the project
    Build(BuildArgs),

    /// Remove the build directory
    Clean(ProfileArgs),

    /// Build and execute the produced binary
    Run(RunArgs),

    /// Build with the test profile and execute the produced binary
    Test(RunArgs),

    /// Lint or format every source file
    Check(CheckArgs),

    /// Add a dependency to a profile document
    Add(AddArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Profile selection shared by most commands.
#[derive(Args, Debug, Clone, Default)]
pub struct ProfileArgs {
    /// Profiles to compose after the implicit `common`, in order
    #[arg(short, long = "profile")]
    pub profiles: Vec<String>,
}

#[derive(Args)]
pub struct NewArgs {
    /// Project name
    pub name: String,

    /// Create a static library instead of an executable
    #[arg(long)]
    pub lib: bool,

    /// Directory to create the project in (defaults to name)
    #[arg(long)]
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct InitArgs {
    /// Project name (defaults to directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Create a static library instead of an executable
    #[arg(long)]
    pub lib: bool,
}

#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub profiles: ProfileArgs,

    /// Feature switches (`name` enables, `no-name` disables)
    #[arg(short = 'F', long = "feature")]
    pub features: Vec<String>,

    /// Backend override (defaults to the manifest's generator)
    #[arg(long, value_enum)]
    pub backend: Option<BackendKind>,
}

#[derive(Args)]
pub struct FetchArgs {
    #[command(flatten)]
    pub profiles: ProfileArgs,

    /// Re-clone dependencies that are already fetched
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub generate: GenerateArgs,

    /// Regenerate the graph even when one exists
    #[arg(long)]
    pub force_generate: bool,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Arguments forwarded to the binary
    #[arg(last = true)]
    pub args: Vec<String>,
}

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub profiles: ProfileArgs,

    /// Run the formatter in place instead of the linter
    #[arg(long)]
    pub format: bool,

    /// Number of parallel jobs (defaults to available cores)
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Dependency name
    pub name: String,

    /// Source kind: local, system, vcpkg, git
    #[arg(long, default_value = "system")]
    pub source: String,

    /// Profile document to edit
    #[arg(short, long, default_value = "common")]
    pub profile: String,

    /// Version (git tag for git dependencies)
    #[arg(long)]
    pub version: Option<String>,

    /// Git branch to check out
    #[arg(long)]
    pub branch: Option<String>,

    /// Clone URL of a git dependency
    #[arg(long)]
    pub url: Option<String>,

    /// Directory of a local dependency
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Explicit include dir of a system dependency
    #[arg(long)]
    pub include: Option<PathBuf>,

    /// Explicit library dir of a system dependency
    #[arg(long)]
    pub lib: Option<PathBuf>,

    /// Vcpkg triplet override
    #[arg(long)]
    pub triplet: Option<String>,

    /// Extra libraries to link alongside the dependency
    #[arg(long = "using")]
    pub using: Vec<String>,

    /// The dependency only provides headers
    #[arg(long)]
    pub header_only: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: CompletionShell,
}
