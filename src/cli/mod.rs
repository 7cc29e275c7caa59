pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "invoice-link")]
#[command(about = "Inspect public tokens and query the invoice-link API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Explain how a requested token would match stored tokens (offline)")]
    Inspect(commands::inspect::InspectArgs),

    #[command(about = "Look up a token against a running server")]
    Lookup(commands::lookup::LookupArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Outcome of a command that already reported its result to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Failed,
}

impl From<CommandStatus> for ExitCode {
    fn from(status: CommandStatus) -> Self {
        match status {
            CommandStatus::Success => ExitCode::SUCCESS,
            CommandStatus::Failed => ExitCode::FAILURE,
        }
    }
}

/// `Err` is for failures nothing has printed yet
pub async fn run(cli: Cli) -> anyhow::Result<CommandStatus> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Inspect(args) => commands::inspect::handle(args, output_format),
        Commands::Lookup(args) => commands::lookup::handle(args, output_format).await,
    }
}
