//! rtpfinder CLI - resolve and inspect game assets from the command line.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod error;

use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "rtpfinder", version, about = "Resolve RPG Maker game assets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve one asset reference the way the engine would
    Resolve(commands::resolve::ResolveArgs),

    /// Fingerprint a directory against an RTP table
    Scan(commands::scan::ScanArgs),

    /// Summarize a game directory's index
    Index(commands::index::IndexArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Resolve(args) => commands::resolve::run(args),
        Commands::Scan(args) => commands::scan::run(args),
        Commands::Index(args) => commands::index::run(args),
    };

    if let Err(error) = result {
        // `resolve` reports misses through the exit code alone.
        if !matches!(error, CliError::NotFound) {
            eprintln!("error: {error}");
        }
        std::process::exit(1);
    }
}
