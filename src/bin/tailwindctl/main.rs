//! tailwindctl CLI - Provision Node.js and build Tailwind CSS

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use tailwindctl::util::diagnostic;
use tailwindctl::ToolchainError;

fn main() {
    if let Err(e) = run() {
        match e.downcast_ref::<ToolchainError>() {
            Some(err) => diagnostic::emit(&err.to_diagnostic(), io::stderr().is_terminal()),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = match cli.log_filter {
        Some(ref directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter `{}`", directives))?,
        None if cli.verbose => EnvFilter::new("tailwindctl=debug"),
        None => EnvFilter::new("tailwindctl=info"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Init(args) => commands::init::execute(args),
        Commands::Build(args) => commands::build::execute(args),
        Commands::Watch(args) => commands::watch::execute(args),
        Commands::Clean(args) => commands::clean::execute(args),
        Commands::Cache(args) => commands::cache::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
