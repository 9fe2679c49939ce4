//! pkgpref CLI
//!
//! Command-line queries against a packages configuration: preference lists,
//! candidate ranks, spec ordering, external installations, and the
//! buildable flag.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use commands::Session;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| CliError::user(format!("failed to set tracing subscriber: {e}")))?;
        tracing::debug!("Verbose mode enabled");
    }

    let session = Session {
        config_files: cli.config,
        virtuals: cli.virtuals,
    };

    match cli.command {
        Some(cmd) => execute_command(&session, cmd, cli.json),
        None => {
            println!("{} package preference queries", "pkgpref".green().bold());
            println!();
            println!("Run {} for available commands.", "pkgpref --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(session: &Session, cmd: Commands, json: bool) -> Result<()> {
    match cmd {
        Commands::Check => commands::run_check(session, json),
        Commands::Order {
            package,
            category,
            provider,
            no_wildcard,
        } => commands::run_order(session, &package, &category, provider.as_deref(), no_wildcard, json),
        Commands::Rank {
            package,
            category,
            provider,
            candidates,
        } => commands::run_rank(session, &package, &category, provider.as_deref(), &candidates, json),
        Commands::Sort { specs } => commands::run_sort(session, &specs, json),
        Commands::Externals { spec } => commands::run_externals(session, &spec, json),
        Commands::Buildable { spec } => commands::run_buildable(session, &spec, json),
    }
}
