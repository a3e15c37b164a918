//! repo-bots CLI
//!
//! Triggers the GitHub maintenance bots by hand, the way a webhook would.

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::RunOptions;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Webhook-triggered GitHub maintenance bots
#[derive(Parser, Debug)]
#[command(name = "repo-bots", author, version, about, long_about = None)]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the registered bots and their settings
    List,

    /// Trigger a bot and print its JSON result
    Run {
        /// Bot name (see `list`)
        bot: String,

        /// JSON trigger body
        #[arg(long)]
        payload: Option<String>,

        /// Compute the plan without making mutating API calls
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            anstream::eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout carries only the JSON result.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.config.as_deref();
    match cli.command {
        Commands::List => cli::run_list(config)?,
        Commands::Run {
            bot,
            payload,
            dry_run,
        } => cli::run_bot(config, &bot, RunOptions { payload, dry_run }).await?,
    }
    Ok(())
}
