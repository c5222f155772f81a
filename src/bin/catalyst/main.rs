//! Catalyst CLI - a declarative build tool for C and C++

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use catalyst::util::{ColorChoice, Shell, Verbosity};
use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("catalyst=debug")
    } else {
        EnvFilter::new("catalyst=info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else if cli.verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    };
    let color: ColorChoice = cli.color.parse().map_err(anyhow::Error::msg)?;
    let shell = Shell::new(verbosity, color);

    let root = match &cli.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("cannot determine current directory")?,
    };

    match cli.command {
        Commands::New(args) => commands::new::execute(args, &shell),
        Commands::Init(args) => commands::init::execute(&root, args, &shell),
        Commands::Generate(args) => commands::generate::execute(&root, args, &shell),
        Commands::Fetch(args) => commands::fetch::execute(&root, args, &shell),
        Commands::Build(args) => commands::build::execute(&root, args, &shell),
        Commands::Clean(args) => commands::clean::execute(&root, args, &shell),
        Commands::Run(args) => commands::run::execute(&root, args, &shell),
        Commands::Test(args) => commands::test::execute(&root, args, &shell),
        Commands::Check(args) => commands::check::execute(&root, args, &shell),
        Commands::Add(args) => commands::add::execute(&root, args, &shell),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
