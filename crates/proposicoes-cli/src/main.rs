//! proposicoes CLI - spreadsheet export client
//!
//! A command-line front-end for the proposicoes API: browse the reference
//! lists and download spreadsheet exports.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use proposicoes_core::AppConfig;

#[derive(Parser)]
#[command(name = "proposicoes")]
#[command(author, version, about = "Spreadsheet export client for the proposicoes API", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: table (default) or json
    #[arg(long, global = true, value_enum, ignore_case = true, default_value = "table")]
    format: output::OutputFormat,

    /// Suppress progress messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// API base URL (or set PROPOSICOES_API_URL env var)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds (or set PROPOSICOES_TIMEOUT_SECS env var)
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a spreadsheet export and save it
    Export(commands::export::ExportArgs),

    /// List municipalities
    Municipalities,

    /// List project species
    Species,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    // Flags win over PROPOSICOES_* env vars
    let config = AppConfig::resolve(cli.api_url, cli.timeout)?;
    config.validate()?;

    let ctx = commands::Context {
        config,
        format: cli.format,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Export(args) => commands::export::execute(&ctx, args).await,
        Commands::Municipalities => {
            commands::references::execute(&ctx, proposicoes_core::ReferenceKind::Municipality)
                .await
        }
        Commands::Species => {
            commands::references::execute(&ctx, proposicoes_core::ReferenceKind::Species).await
        }
        Commands::Config { action } => commands::config::execute(&ctx, action).await,
    }
}
