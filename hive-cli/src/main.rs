//! Hive CLI - Command-line interface
//!
//! Commands:
//! - replay: Rebuild a game from a JSON record and print its state
//! - validate: Check that every action in a record is legal

mod replay_cmd;
mod validate_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use replay_cmd::ReplayArgs;
use validate_cmd::ValidateArgs;

#[derive(Parser)]
#[command(name = "hive")]
#[command(about = "Hive rules engine")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a game record and print the resulting state
    Replay(ReplayArgs),
    /// Check a game record action by action
    Validate(ValidateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Replay(args) => replay_cmd::run(args),
        Commands::Validate(args) => validate_cmd::run(args),
    }
}
