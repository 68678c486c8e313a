use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// Maximum number of rows returned by a recent-readings query.
pub const RECENT_METRICS_LIMIT: i64 = 20;

/// One timestamped measurement owned by an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub id: i64,

    /// Surrogate id of the owning agent
    pub agent_id: i64,

    /// Measurement kind, e.g. "cpu" or "memory"
    #[serde(rename = "type")]
    pub metric_type: String,

    /// String-encoded measurement payload
    pub value: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input record for a new measurement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMetric {
    #[serde(rename = "type")]
    pub metric_type: String,
    pub value: String,
}

impl NewMetric {
    pub fn new(metric_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            metric_type: metric_type.into(),
            value: value.into(),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.metric_type.trim().is_empty() {
            return Err(DomainError::ValidationFailed(
                "metric type cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Projection returned by recent-readings queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentMetric {
    pub id: i64,
    #[serde(rename = "type")]
    pub metric_type: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
}

/// One distinct metric type recorded for an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricTypeSummary {
    #[serde(rename = "type")]
    pub metric_type: String,
}
