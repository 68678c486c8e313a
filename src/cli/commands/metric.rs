//! Metric CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::display::{action_success, list_table, output, render_list, CommandOutput};
use crate::domain::models::{Metric, MetricTypeSummary, NewMetric, RecentMetric};
use crate::store::Store;

#[derive(Args, Debug)]
pub struct MetricArgs {
    #[command(subcommand)]
    pub command: MetricCommands,
}

#[derive(Subcommand, Debug)]
pub enum MetricCommands {
    /// Record a metric for an agent
    Add {
        agent_uuid: String,
        #[arg(value_name = "TYPE")]
        metric_type: String,
        value: String,
    },
    /// List every stored metric
    List,
    /// List the metric types an agent has reported
    Types {
        agent_uuid: String,
    },
    /// Show the latest readings of one type for an agent
    Recent {
        #[arg(value_name = "TYPE")]
        metric_type: String,
        agent_uuid: String,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct MetricListOutput {
    pub metrics: Vec<Metric>,
    pub total: usize,
}

impl CommandOutput for MetricListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "agent", "type", "value", "created"]);
        for metric in &self.metrics {
            table.add_row(vec![
                metric.id.to_string(),
                metric.agent_id.to_string(),
                metric.metric_type.clone(),
                metric.value.clone(),
                metric.created_at.to_rfc3339(),
            ]);
        }
        render_list("metric", &table, self.total)
    }
}

#[derive(Debug, serde::Serialize)]
pub struct RecentMetricsOutput {
    pub agent_uuid: String,
    pub metrics: Vec<RecentMetric>,
    pub total: usize,
}

impl CommandOutput for RecentMetricsOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "type", "value", "created"]);
        for metric in &self.metrics {
            table.add_row(vec![
                metric.id.to_string(),
                metric.metric_type.clone(),
                metric.value.clone(),
                metric.created_at.to_rfc3339(),
            ]);
        }
        render_list("reading", &table, self.total)
    }
}

#[derive(Debug, serde::Serialize)]
pub struct MetricTypesOutput {
    pub agent_uuid: String,
    pub types: Vec<MetricTypeSummary>,
}

impl CommandOutput for MetricTypesOutput {
    fn to_human(&self) -> String {
        if self.types.is_empty() {
            return format!("No metrics recorded for {}.", self.agent_uuid);
        }
        let mut lines = vec![format!("Metric types for {}:", self.agent_uuid)];
        lines.extend(self.types.iter().map(|t| format!("  - {}", t.metric_type)));
        lines.join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct MetricActionOutput {
    pub success: bool,
    pub message: String,
    pub metric: Metric,
}

impl CommandOutput for MetricActionOutput {
    fn to_human(&self) -> String {
        action_success(&self.message)
    }
}

pub async fn execute(args: MetricArgs, store: &Store, json_mode: bool) -> Result<()> {
    let repo = store.metrics();

    match args.command {
        MetricCommands::Add { agent_uuid, metric_type, value } => {
            let metric = repo.create(&agent_uuid, &NewMetric::new(metric_type, value)).await?;
            let out = MetricActionOutput {
                success: true,
                message: format!("Metric {} recorded for {agent_uuid}", metric.id),
                metric,
            };
            output(&out, json_mode);
        }

        MetricCommands::List => {
            let metrics = repo.find().await?;
            let out = MetricListOutput {
                total: metrics.len(),
                metrics,
            };
            output(&out, json_mode);
        }

        MetricCommands::Types { agent_uuid } => {
            let types = repo.find_by_agent_uuid(&agent_uuid).await?;
            output(&MetricTypesOutput { agent_uuid, types }, json_mode);
        }

        MetricCommands::Recent { metric_type, agent_uuid } => {
            let metrics = repo.find_by_type_agent_uuid(&metric_type, &agent_uuid).await?;
            let out = RecentMetricsOutput {
                agent_uuid,
                total: metrics.len(),
                metrics,
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}
