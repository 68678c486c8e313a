//! SQLite implementation of the MetricRepository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Metric, MetricTypeSummary, NewMetric, RecentMetric, RECENT_METRICS_LIMIT};
use crate::domain::ports::MetricRepository;

#[derive(Clone)]
pub struct SqliteMetricRepository {
    pool: SqlitePool,
}

impl SqliteMetricRepository {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MetricRepository for SqliteMetricRepository {
    async fn create(&self, agent_uuid: &str, metric: &NewMetric) -> DomainResult<Metric> {
        metric.validate()?;

        // The owning agent is resolved inside the insert itself, so no row can
        // be written for an agent that does not exist at that instant.
        let now = super::format_datetime(&Utc::now());
        let row: Option<MetricRow> = sqlx::query_as(
            r#"INSERT INTO metrics (agent_id, type, value, created_at, updated_at)
               SELECT id, ?, ?, ?, ? FROM agents WHERE uuid = ?
               RETURNING id, agent_id, type, value, created_at, updated_at"#
        )
        .bind(&metric.metric_type)
        .bind(&metric.value)
        .bind(&now)
        .bind(&now)
        .bind(agent_uuid)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            tracing::warn!(agent_uuid, metric_type = %metric.metric_type, "metric rejected: unknown agent");
            return Err(DomainError::AgentNotFound(agent_uuid.to_string()));
        };

        tracing::debug!(agent_uuid, agent_id = row.agent_id, metric_id = row.id, metric_type = %row.metric_type, "metric recorded");
        row.try_into()
    }

    async fn find(&self) -> DomainResult<Vec<Metric>> {
        let rows: Vec<MetricRow> = sqlx::query_as(
            "SELECT id, agent_id, type, value, created_at, updated_at FROM metrics ORDER BY id"
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn find_by_agent_uuid(&self, agent_uuid: &str) -> DomainResult<Vec<MetricTypeSummary>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"SELECT m.type FROM metrics m
               INNER JOIN agents a ON a.id = m.agent_id
               WHERE a.uuid = ?
               GROUP BY m.type
               ORDER BY m.type"#
        )
        .bind(agent_uuid)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(metric_type,)| MetricTypeSummary { metric_type })
            .collect())
    }

    async fn find_by_type_agent_uuid(
        &self,
        metric_type: &str,
        agent_uuid: &str,
    ) -> DomainResult<Vec<RecentMetric>> {
        let rows: Vec<RecentMetricRow> = sqlx::query_as(
            r#"SELECT m.id, m.type, m.value, m.created_at FROM metrics m
               INNER JOIN agents a ON a.id = m.agent_id
               WHERE m.type = ? AND a.uuid = ?
               ORDER BY m.created_at DESC, m.id DESC
               LIMIT ?"#
        )
        .bind(metric_type)
        .bind(agent_uuid)
        .bind(RECENT_METRICS_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[derive(sqlx::FromRow)]
struct MetricRow {
    id: i64,
    agent_id: i64,
    #[sqlx(rename = "type")]
    metric_type: String,
    value: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<MetricRow> for Metric {
    type Error = DomainError;

    fn try_from(row: MetricRow) -> Result<Self, Self::Error> {
        let created_at = super::parse_datetime(&row.created_at)?;
        let updated_at = super::parse_datetime(&row.updated_at)?;

        Ok(Self {
            id: row.id,
            agent_id: row.agent_id,
            metric_type: row.metric_type,
            value: row.value,
            created_at,
            updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RecentMetricRow {
    id: i64,
    #[sqlx(rename = "type")]
    metric_type: String,
    value: String,
    created_at: String,
}

impl TryFrom<RecentMetricRow> for RecentMetric {
    type Error = DomainError;

    fn try_from(row: RecentMetricRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            metric_type: row.metric_type,
            value: row.value,
            created_at: super::parse_datetime(&row.created_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteAgentRepository};
    use crate::domain::models::NewAgent;
    use crate::domain::ports::AgentRepository;

    const UUID: &str = "yyy-yyy-yyy";

    async fn setup_test_repos() -> (SqliteAgentRepository, SqliteMetricRepository, SqlitePool) {
        let pool = create_migrated_test_pool().await.unwrap();
        let agents = SqliteAgentRepository::new(pool.clone());
        agents
            .create_or_update(&NewAgent::new(UUID, "fixture", "platzi", "test-host", 0))
            .await
            .unwrap();
        (agents, SqliteMetricRepository::new(pool.clone()), pool)
    }

    async fn insert_at(pool: &SqlitePool, agent_id: i64, metric_type: &str, value: &str, created_at: &str) {
        sqlx::query(
            "INSERT INTO metrics (agent_id, type, value, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(agent_id)
        .bind(metric_type)
        .bind(value)
        .bind(created_at)
        .bind(created_at)
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_create_metric_for_existing_agent() {
        let (agents, metrics, _) = setup_test_repos().await;
        let owner = agents.find_by_uuid(UUID).await.unwrap().unwrap();

        let metric = metrics.create(UUID, &NewMetric::new("cpu", "12.5")).await.unwrap();

        assert!(metric.id > 0);
        assert_eq!(metric.agent_id, owner.id);
        assert_eq!(metric.metric_type, "cpu");
        assert_eq!(metric.value, "12.5");
    }

    #[tokio::test]
    async fn test_create_metric_for_unknown_agent_fails() {
        let (_, metrics, _) = setup_test_repos().await;

        let result = metrics.create("no-such-agent", &NewMetric::new("cpu", "1")).await;

        assert!(matches!(result, Err(DomainError::AgentNotFound(ref uuid)) if uuid == "no-such-agent"));
        assert!(metrics.find().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_orphan_insert_rejected_by_foreign_key() {
        let (_, _, pool) = setup_test_repos().await;

        let err = sqlx::query(
            "INSERT INTO metrics (agent_id, type, value, created_at, updated_at) VALUES (4242, 'cpu', '1', 'x', 'x')",
        )
        .execute(&pool)
        .await
        .unwrap_err();

        assert!(matches!(DomainError::from(err), DomainError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_find_returns_all_metrics() {
        let (agents, metrics, _) = setup_test_repos().await;
        agents
            .create_or_update(&NewAgent::new("other", "fixture", "platzi", "test-host", 1))
            .await
            .unwrap();

        metrics.create(UUID, &NewMetric::new("cpu", "1")).await.unwrap();
        metrics.create(UUID, &NewMetric::new("memory", "2")).await.unwrap();
        metrics.create("other", &NewMetric::new("cpu", "3")).await.unwrap();

        assert_eq!(metrics.find().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_find_by_agent_uuid_groups_types() {
        let (agents, metrics, _) = setup_test_repos().await;
        agents
            .create_or_update(&NewAgent::new("other", "fixture", "platzi", "test-host", 1))
            .await
            .unwrap();

        for i in 0..5 {
            metrics.create(UUID, &NewMetric::new("cpu", i.to_string())).await.unwrap();
        }
        for i in 0..2 {
            metrics.create(UUID, &NewMetric::new("memory", i.to_string())).await.unwrap();
        }
        metrics.create("other", &NewMetric::new("disk", "9")).await.unwrap();

        let types: Vec<String> = metrics
            .find_by_agent_uuid(UUID)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.metric_type)
            .collect();

        assert_eq!(types, vec!["cpu", "memory"]);
        assert!(metrics.find_by_agent_uuid("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_type_agent_uuid_newest_first() {
        let (agents, metrics, pool) = setup_test_repos().await;
        let owner = agents.find_by_uuid(UUID).await.unwrap().unwrap();

        // Inserted out of chronological order on purpose.
        insert_at(&pool, owner.id, "cpu", "middle", "2024-01-01T00:00:02.000000Z").await;
        insert_at(&pool, owner.id, "cpu", "newest", "2024-01-01T00:00:03.000000Z").await;
        insert_at(&pool, owner.id, "cpu", "oldest", "2024-01-01T00:00:01.000000Z").await;
        insert_at(&pool, owner.id, "memory", "other-type", "2024-01-01T00:00:04.000000Z").await;

        let recent = metrics.find_by_type_agent_uuid("cpu", UUID).await.unwrap();
        let values: Vec<&str> = recent.iter().map(|m| m.value.as_str()).collect();

        assert_eq!(values, vec!["newest", "middle", "oldest"]);
        assert!(recent.iter().all(|m| m.metric_type == "cpu"));
    }

    #[tokio::test]
    async fn test_find_by_type_agent_uuid_is_capped() {
        let (_, metrics, _) = setup_test_repos().await;

        for i in 0..25 {
            metrics.create(UUID, &NewMetric::new("cpu", i.to_string())).await.unwrap();
        }

        let recent = metrics.find_by_type_agent_uuid("cpu", UUID).await.unwrap();
        assert_eq!(recent.len(), RECENT_METRICS_LIMIT as usize);
        assert_eq!(recent[0].value, "24");
        assert!(recent.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[tokio::test]
    async fn test_find_by_type_agent_uuid_scoped_to_agent() {
        let (agents, metrics, _) = setup_test_repos().await;
        agents
            .create_or_update(&NewAgent::new("other", "fixture", "platzi", "test-host", 1))
            .await
            .unwrap();

        metrics.create("other", &NewMetric::new("cpu", "foreign")).await.unwrap();

        assert!(metrics.find_by_type_agent_uuid("cpu", UUID).await.unwrap().is_empty());
    }
}
