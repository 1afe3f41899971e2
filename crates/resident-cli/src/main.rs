//! Resident CLI
//!
//! Runs one masterdata proxy operation against the configured provider and
//! prints the response envelope as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "resident")]
#[command(about = "Resident masterdata proxy", long_about = None)]
struct Cli {
    /// Configuration file (TOML); RESIDENT_* environment variables override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Masterdata lookups
    #[command(flatten)]
    Masterdata(commands::masterdata::MasterdataCommand),
    /// Configuration operations
    Config(commands::config::ConfigArgs),
}

/// Exit code when the envelope carries an error
const EXIT_ENVELOPE_ERROR: u8 = 1;
/// Exit code when the command could not run at all
const EXIT_SETUP_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Masterdata(command) => {
            commands::masterdata::execute(cli.config.as_deref(), command).await
        }
        Commands::Config(args) => commands::config::execute(cli.config.as_deref(), args),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_ENVELOPE_ERROR),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_SETUP_ERROR)
        }
    }
}
