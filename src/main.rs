//! telemetry-db CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;

use telemetry_db::cli::{self, Cli, Commands};
use telemetry_db::infrastructure::config::ConfigLoader;
use telemetry_db::infrastructure::logging::LoggerImpl;
use telemetry_db::Store;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let json_mode = cli.json;

    // Dropped after the error is reported so the log file is flushed.
    let mut logger = None;
    match run(cli, &mut logger).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            cli::report_error(&err, json_mode);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, logger: &mut Option<LoggerImpl>) -> Result<()> {
    let config = ConfigLoader::load(cli.config.as_deref())?;
    *logger = Some(LoggerImpl::init(&config.logging)?);

    match cli.command {
        Commands::Setup(args) => cli::commands::setup::execute(args, &config, cli.json).await,
        Commands::Agent(args) => {
            let store = connect(&config).await?;
            let result = cli::commands::agent::execute(args, &store, cli.json).await;
            store.close().await;
            result
        }
        Commands::Metric(args) => {
            let store = connect(&config).await?;
            let result = cli::commands::metric::execute(args, &store, cli.json).await;
            store.close().await;
            result
        }
    }
}

async fn connect(config: &telemetry_db::Config) -> Result<Store> {
    Store::connect(config)
        .await
        .with_context(|| format!("Failed to open database {}", config.database.url))
}
