//! Agent CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use uuid::Uuid;

use crate::cli::display::{action_failure, action_success, list_table, output, render_list, CommandOutput};
use crate::domain::models::{Agent, NewAgent};
use crate::domain::ports::AgentFilter;
use crate::store::Store;

#[derive(Args, Debug)]
pub struct AgentArgs {
    #[command(subcommand)]
    pub command: AgentCommands,
}

#[derive(Subcommand, Debug)]
pub enum AgentCommands {
    /// List agents
    List {
        /// Show only connected agents
        #[arg(long, conflicts_with = "disconnected")]
        connected: bool,
        /// Show only disconnected agents
        #[arg(long)]
        disconnected: bool,
        /// Filter by username
        #[arg(short, long)]
        username: Option<String>,
    },
    /// Show an agent by uuid
    Show {
        uuid: String,
    },
    /// Show an agent by numeric id
    Get {
        id: i64,
    },
    /// Register an agent, or update the one with the same uuid
    Upsert {
        /// Agent uuid (generated when omitted)
        uuid: Option<String>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        hostname: String,
        #[arg(long)]
        pid: i64,
        /// Record the agent as disconnected
        #[arg(long)]
        disconnected: bool,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct AgentListOutput {
    pub agents: Vec<Agent>,
    pub total: usize,
}

impl CommandOutput for AgentListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "uuid", "name", "username", "hostname", "pid", "connected"]);
        for agent in &self.agents {
            table.add_row(vec![
                agent.id.to_string(),
                agent.uuid.clone(),
                agent.name.clone(),
                agent.username.clone(),
                agent.hostname.clone(),
                agent.pid.to_string(),
                if agent.connected { "yes" } else { "no" }.to_string(),
            ]);
        }
        render_list("agent", &table, self.total)
    }
}

#[derive(Debug, serde::Serialize)]
pub struct AgentActionOutput {
    pub success: bool,
    pub message: String,
    pub agent: Option<Agent>,
}

impl CommandOutput for AgentActionOutput {
    fn to_human(&self) -> String {
        let Some(agent) = &self.agent else {
            return action_failure(&self.message);
        };

        let lines = [
            action_success(&self.message),
            format!("  ID:        {}", agent.id),
            format!("  UUID:      {}", agent.uuid),
            format!("  Name:      {}", agent.name),
            format!("  Username:  {}", agent.username),
            format!("  Hostname:  {}", agent.hostname),
            format!("  PID:       {}", agent.pid),
            format!("  Connected: {}", agent.connected),
            format!("  Updated:   {}", agent.updated_at.to_rfc3339()),
        ];
        lines.join("\n")
    }
}

impl AgentActionOutput {
    fn found(agent: Option<Agent>, key: &str) -> Self {
        match agent {
            Some(agent) => Self {
                success: true,
                message: format!("Agent {}", agent.uuid),
                agent: Some(agent),
            },
            None => Self {
                success: false,
                message: format!("Agent not found: {key}"),
                agent: None,
            },
        }
    }
}

pub async fn execute(args: AgentArgs, store: &Store, json_mode: bool) -> Result<()> {
    let repo = store.agents();

    match args.command {
        AgentCommands::List { connected, disconnected, username } => {
            let filter = AgentFilter {
                connected: if connected {
                    Some(true)
                } else if disconnected {
                    Some(false)
                } else {
                    None
                },
                username,
            };

            let agents = repo.list(filter).await?;
            let out = AgentListOutput {
                total: agents.len(),
                agents,
            };
            output(&out, json_mode);
        }

        AgentCommands::Show { uuid } => {
            let agent = repo.find_by_uuid(&uuid).await?;
            output(&AgentActionOutput::found(agent, &uuid), json_mode);
        }

        AgentCommands::Get { id } => {
            let agent = repo.find_by_id(id).await?;
            output(&AgentActionOutput::found(agent, &id.to_string()), json_mode);
        }

        AgentCommands::Upsert { uuid, name, username, hostname, pid, disconnected } => {
            let uuid = uuid.unwrap_or_else(|| Uuid::new_v4().to_string());
            let record = NewAgent::new(uuid, name, username, hostname, pid).with_connected(!disconnected);

            let agent = repo.create_or_update(&record).await?;
            let out = AgentActionOutput {
                success: true,
                message: format!("Agent saved: {}", agent.uuid),
                agent: Some(agent),
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}
