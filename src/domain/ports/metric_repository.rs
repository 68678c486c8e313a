//! Metric repository port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Metric, MetricTypeSummary, NewMetric, RecentMetric};

/// Repository interface for Metric persistence.
///
/// Every metric belongs to an agent addressed by its uuid.
#[async_trait]
pub trait MetricRepository: Send + Sync {
    /// Record a metric for the agent with the given uuid.
    ///
    /// Fails with `DomainError::AgentNotFound` when no such agent exists.
    async fn create(&self, agent_uuid: &str, metric: &NewMetric) -> DomainResult<Metric>;

    /// Get all metrics.
    async fn find(&self) -> DomainResult<Vec<Metric>>;

    /// Get the distinct metric types recorded for an agent.
    async fn find_by_agent_uuid(&self, agent_uuid: &str) -> DomainResult<Vec<MetricTypeSummary>>;

    /// Get the most recent metrics of one type for an agent, newest first.
    async fn find_by_type_agent_uuid(
        &self,
        metric_type: &str,
        agent_uuid: &str,
    ) -> DomainResult<Vec<RecentMetric>>;
}
