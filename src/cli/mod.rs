//! Operator command line for the telemetry store.

pub mod commands;
pub mod display;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::agent::AgentArgs;
use commands::metric::MetricArgs;
use commands::setup::SetupArgs;

#[derive(Parser)]
#[command(name = "telemetry-db")]
#[command(about = "Inspect and maintain the agent telemetry database", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file merged over ./telemetry-db.yaml
    #[arg(short, long, global = true, env = "TELEMETRY_DB_CONFIG_FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Drop and recreate the database schema
    Setup(SetupArgs),

    /// Agent commands
    Agent(AgentArgs),

    /// Metric commands
    Metric(MetricArgs),
}

/// Log the error and print it for the operator.
///
/// The caller must still hold its `LoggerImpl` so the error reaches the log
/// file.
pub fn report_error(err: &anyhow::Error, json_mode: bool) {
    tracing::error!(error = %err, "command failed");
    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{}", display::action_failure(&format!("{err:#}")));
    }
}
