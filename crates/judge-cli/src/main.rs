//! judge-sync CLI
//!
//! Uploads problems to the judge, applies course requests and mirrors
//! courses back into the repository.

mod cli;
mod commands;
mod context;
mod error;
mod output;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::Workspace;
use error::Result;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

/// `info` by default, `debug` with `--verbose`; `RUST_LOG` wins.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let workspace = Workspace::open(cli.repo.as_deref(), &cwd)?;

    match cli.command {
        Commands::Upload {
            selection,
            can_create,
            ci,
            remote,
        } => commands::run_upload(&workspace, &selection, can_create, ci, &remote),
        Commands::Courses { input, remote } => {
            commands::run_courses(&workspace, input.as_deref(), &remote)
        }
        Commands::Download { remote } => commands::run_download(&workspace, &remote),
        Commands::Validate { selection, ci } => commands::run_validate(&workspace, &selection, ci),
        Commands::List { selection } => commands::run_list(&workspace, &selection),
    }
}
