//! csspipe - PostCSS pipeline resolution and dependency cache keys
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use csspipe::cli::{Cli, Commands};
use csspipe::config::ConfigManager;
use csspipe::error::{CsspipeError, CsspipeResult};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> CsspipeResult<()> {
    let cli = Cli::parse();

    // 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("csspipe=warn"),
        1 => EnvFilter::new("csspipe=info"),
        _ => EnvFilter::new("csspipe=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };

    let local_config_path = if cli.no_local {
        debug!("Local config discovery disabled (--no-local)");
        None
    } else {
        let cwd = std::env::current_dir()
            .map_err(|e| CsspipeError::io("getting current directory", e))?;
        let found = ConfigManager::find_local_config(&cwd);
        if let Some(ref path) = found {
            debug!("Found local config: {}", path.display());
        }
        found
    };

    let config = config_manager
        .load_merged(local_config_path.as_deref())
        .await?;

    match cli.command {
        Commands::Resolve(args) => csspipe::cli::commands::resolve(args, &config).await,
        Commands::Digest(args) => csspipe::cli::commands::digest(args, &config).await,
        Commands::Check(args) => csspipe::cli::commands::check(args, &config).await,
        Commands::Config(args) => {
            csspipe::cli::commands::config(args, &config_manager, &config).await
        }
    }
}
