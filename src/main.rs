use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use symdex::cli::{Cli, Commands};
use symdex::config::Config;
use symdex::logging::{init_early_logging, init_logging};
use symdex::metrics;

#[tokio::main]
async fn main() -> Result<()> {
    let project_root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let config = match Config::load(&project_root) {
        Ok(config) => config,
        Err(e) => {
            init_early_logging();
            tracing::error!("Failed to load configuration: {:#}", e);
            return Err(e);
        }
    };

    // Held until exit so buffered log lines are flushed
    let _logging_guard = init_logging(&config.logging, &project_root)?;

    tracing::info!("symdex starting up");
    tracing::debug!("Project root: {}", project_root.display());

    metrics::register_metrics();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force } => {
            symdex::commands::init::run(force).await?;
        }
        Commands::Scan { notify } => {
            symdex::commands::scan::run(notify).await?;
        }
        Commands::Watch { debounce_ms } => {
            symdex::commands::watch::run(debounce_ms).await?;
        }
        Commands::Find {
            query,
            prefix,
            limit,
        } => {
            symdex::commands::find::run(&query, prefix, limit).await?;
        }
        Commands::Stats { prometheus } => {
            symdex::commands::stats::run(prometheus).await?;
        }
    }

    Ok(())
}
