//! Agent repository port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Agent, NewAgent};

/// Filter criteria for listing agents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentFilter {
    pub connected: Option<bool>,
    pub username: Option<String>,
}

impl AgentFilter {
    pub fn connected() -> Self {
        Self {
            connected: Some(true),
            ..Default::default()
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}

/// Repository interface for Agent persistence.
#[async_trait]
pub trait AgentRepository: Send + Sync {
    /// Insert the agent, or overwrite the mutable fields of the agent
    /// already registered under the same uuid.
    async fn create_or_update(&self, agent: &NewAgent) -> DomainResult<Agent>;

    /// List agents matching the filter.
    async fn list(&self, filter: AgentFilter) -> DomainResult<Vec<Agent>>;

    /// Get all agents.
    async fn find(&self) -> DomainResult<Vec<Agent>> {
        self.list(AgentFilter::default()).await
    }

    /// Get all connected agents.
    async fn find_connected(&self) -> DomainResult<Vec<Agent>> {
        self.list(AgentFilter::connected()).await
    }

    /// Get connected agents owned by a user. Disconnected agents are never returned.
    async fn find_by_username(&self, username: &str) -> DomainResult<Vec<Agent>> {
        self.list(AgentFilter::connected().with_username(username)).await
    }

    /// Get an agent by its business key.
    async fn find_by_uuid(&self, uuid: &str) -> DomainResult<Option<Agent>>;

    /// Get an agent by its surrogate id.
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Agent>>;
}
