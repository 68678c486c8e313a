use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// A monitored host or process that reports telemetry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// Surrogate identifier assigned by the store
    pub id: i64,

    /// Caller-supplied business key, unique across all agents
    pub uuid: String,

    /// Display name of the agent
    pub name: String,

    /// User the monitored process runs as
    pub username: String,

    /// Host the monitored process runs on
    pub hostname: String,

    /// Process identifier of the monitored process
    pub pid: i64,

    /// Whether the agent is currently connected
    pub connected: bool,

    /// Row creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Input record for creating or updating an agent, keyed by `uuid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAgent {
    pub uuid: String,
    pub name: String,
    pub username: String,
    pub hostname: String,
    pub pid: i64,

    /// Newly reported agents are considered connected unless stated otherwise
    #[serde(default = "default_connected")]
    pub connected: bool,
}

const fn default_connected() -> bool {
    true
}

impl NewAgent {
    /// Create a connected agent record.
    pub fn new(
        uuid: impl Into<String>,
        name: impl Into<String>,
        username: impl Into<String>,
        hostname: impl Into<String>,
        pid: i64,
    ) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            username: username.into(),
            hostname: hostname.into(),
            pid,
            connected: default_connected(),
        }
    }

    pub const fn with_connected(mut self, connected: bool) -> Self {
        self.connected = connected;
        self
    }

    /// Reject records that cannot be keyed.
    pub fn validate(&self) -> DomainResult<()> {
        if self.uuid.trim().is_empty() {
            return Err(DomainError::ValidationFailed(
                "agent uuid cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
