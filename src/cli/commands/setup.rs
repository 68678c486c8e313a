//! Implementation of the `telemetry-db setup` command.

use anyhow::{Context, Result};
use clap::Args;
use console::Term;

use crate::cli::display::{action_success, output, CommandOutput};
use crate::domain::models::Config;
use crate::store::Store;

#[derive(Args, Debug)]
pub struct SetupArgs {
    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct SetupOutput {
    pub success: bool,
    pub message: String,
    pub database_url: String,
}

impl CommandOutput for SetupOutput {
    fn to_human(&self) -> String {
        if self.success {
            action_success(&self.message)
        } else {
            self.message.clone()
        }
    }
}

pub async fn execute(args: SetupArgs, config: &Config, json_mode: bool) -> Result<()> {
    if !args.yes && !confirm(&config.database.url)? {
        let out = SetupOutput {
            success: false,
            message: "Setup aborted.".to_string(),
            database_url: config.database.url.clone(),
        };
        output(&out, json_mode);
        return Ok(());
    }

    let config = Config {
        setup: true,
        ..config.clone()
    };
    let store = Store::connect(&config)
        .await
        .context("Failed to reset database schema")?;
    store.close().await;

    let out = SetupOutput {
        success: true,
        message: format!("Database schema recreated at {}", config.database.url),
        database_url: config.database.url,
    };
    output(&out, json_mode);
    Ok(())
}

fn confirm(database_url: &str) -> Result<bool> {
    let term = Term::stderr();
    term.write_line(&format!(
        "This will destroy every agent and metric stored in {database_url}."
    ))?;
    term.write_str("Continue? [y/N] ")?;
    let answer = term.read_line().context("Failed to read confirmation")?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
