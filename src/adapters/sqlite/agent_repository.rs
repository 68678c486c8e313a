//! SQLite implementation of the AgentRepository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Agent, NewAgent};
use crate::domain::ports::{AgentFilter, AgentRepository};

const AGENT_COLUMNS: &str = "id, uuid, name, username, hostname, pid, connected, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteAgentRepository {
    pool: SqlitePool,
}

impl SqliteAgentRepository {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AgentRepository for SqliteAgentRepository {
    async fn create_or_update(&self, agent: &NewAgent) -> DomainResult<Agent> {
        agent.validate()?;
        let now = super::format_datetime(&Utc::now());

        let row: AgentRow = sqlx::query_as(&format!(
            r#"INSERT INTO agents (uuid, name, username, hostname, pid, connected, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(uuid) DO UPDATE SET
                   name = excluded.name,
                   username = excluded.username,
                   hostname = excluded.hostname,
                   pid = excluded.pid,
                   connected = excluded.connected,
                   updated_at = excluded.updated_at
               RETURNING {AGENT_COLUMNS}"#
        ))
        .bind(&agent.uuid)
        .bind(&agent.name)
        .bind(&agent.username)
        .bind(&agent.hostname)
        .bind(agent.pid)
        .bind(agent.connected)
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(uuid = %agent.uuid, id = row.id, connected = agent.connected, "agent upserted");
        row.try_into()
    }

    async fn list(&self, filter: AgentFilter) -> DomainResult<Vec<Agent>> {
        let mut sql = format!("SELECT {AGENT_COLUMNS} FROM agents WHERE 1=1");

        if filter.connected.is_some() {
            sql.push_str(" AND connected = ?");
        }
        if filter.username.is_some() {
            sql.push_str(" AND username = ?");
        }

        sql.push_str(" ORDER BY id");

        let mut q = sqlx::query_as::<_, AgentRow>(&sql);
        if let Some(connected) = filter.connected {
            q = q.bind(connected);
        }
        if let Some(username) = &filter.username {
            q = q.bind(username);
        }

        let rows: Vec<AgentRow> = q.fetch_all(&self.pool).await?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn find_by_uuid(&self, uuid: &str) -> DomainResult<Option<Agent>> {
        let row: Option<AgentRow> = sqlx::query_as(&format!(
            "SELECT {AGENT_COLUMNS} FROM agents WHERE uuid = ?"
        ))
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Agent>> {
        let row: Option<AgentRow> = sqlx::query_as(&format!(
            "SELECT {AGENT_COLUMNS} FROM agents WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }
}

#[derive(sqlx::FromRow)]
struct AgentRow {
    id: i64,
    uuid: String,
    name: String,
    username: String,
    hostname: String,
    pid: i64,
    connected: bool,
    created_at: String,
    updated_at: String,
}

impl TryFrom<AgentRow> for Agent {
    type Error = DomainError;

    fn try_from(row: AgentRow) -> Result<Self, Self::Error> {
        let created_at = super::parse_datetime(&row.created_at)?;
        let updated_at = super::parse_datetime(&row.updated_at)?;

        Ok(Self {
            id: row.id,
            uuid: row.uuid,
            name: row.name,
            username: row.username,
            hostname: row.hostname,
            pid: row.pid,
            connected: row.connected,
            created_at,
            updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;

    async fn setup_test_repo() -> SqliteAgentRepository {
        let pool = create_migrated_test_pool().await.unwrap();
        SqliteAgentRepository::new(pool)
    }

    async fn seed_fixtures(repo: &SqliteAgentRepository) {
        let fixtures = [
            NewAgent::new("yyy-yyy-yyy", "fixture", "platzi", "test-host", 0),
            NewAgent::new("yyy-yyy-yyw", "fixture", "platzi", "test-host", 0).with_connected(false),
            NewAgent::new("yyy-yyy-yyx", "fixture", "franndy", "test-host", 0),
            NewAgent::new("yyy-yyy-yyz", "test", "test", "test-host", 0).with_connected(false),
        ];
        for agent in &fixtures {
            repo.create_or_update(agent).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_create_new_agent() {
        let repo = setup_test_repo().await;
        let input = NewAgent::new("123-123-123", "Anuel", "test", "nasa", 0).with_connected(false);

        let agent = repo.create_or_update(&input).await.unwrap();

        assert!(agent.id > 0);
        assert_eq!(agent.uuid, input.uuid);
        assert_eq!(agent.name, input.name);
        assert_eq!(agent.username, input.username);
        assert_eq!(agent.hostname, input.hostname);
        assert_eq!(agent.pid, input.pid);
        assert!(!agent.connected);
        assert_eq!(agent.created_at, agent.updated_at);
    }

    #[tokio::test]
    async fn test_update_existing_agent_in_place() {
        let repo = setup_test_repo().await;
        let created = repo
            .create_or_update(&NewAgent::new("yyy-yyy-yyy", "fixture", "platzi", "test-host", 0))
            .await
            .unwrap();

        let updated = repo
            .create_or_update(
                &NewAgent::new("yyy-yyy-yyy", "renamed", "platzi", "other-host", 99).with_connected(false),
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "renamed");
        assert_eq!(updated.hostname, "other-host");
        assert_eq!(updated.pid, 99);
        assert!(!updated.connected);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(repo.find().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_uuid() {
        let repo = setup_test_repo().await;
        let result = repo.create_or_update(&NewAgent::new("", "x", "y", "z", 1)).await;
        assert!(matches!(result, Err(DomainError::ValidationFailed(_))));
        assert!(repo.find().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_returns_all_agents() {
        let repo = setup_test_repo().await;
        seed_fixtures(&repo).await;

        let agents = repo.find().await.unwrap();
        assert_eq!(agents.len(), 4);
    }

    #[tokio::test]
    async fn test_find_connected() {
        let repo = setup_test_repo().await;
        seed_fixtures(&repo).await;

        let agents = repo.find_connected().await.unwrap();
        assert_eq!(agents.len(), 2);
        assert!(agents.iter().all(|a| a.connected));
    }

    #[tokio::test]
    async fn test_find_by_username_only_connected() {
        let repo = setup_test_repo().await;
        seed_fixtures(&repo).await;

        let agents = repo.find_by_username("platzi").await.unwrap();
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].uuid, "yyy-yyy-yyy");

        assert!(repo.find_by_username("test").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_disconnected_by_username() {
        let repo = setup_test_repo().await;
        seed_fixtures(&repo).await;

        let filter = AgentFilter {
            connected: Some(false),
            username: Some("platzi".to_string()),
        };
        let agents = repo.list(filter).await.unwrap();
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].uuid, "yyy-yyy-yyw");
    }

    #[tokio::test]
    async fn test_find_by_uuid() {
        let repo = setup_test_repo().await;
        seed_fixtures(&repo).await;

        let found = repo.find_by_uuid("yyy-yyy-yyx").await.unwrap();
        assert_eq!(found.map(|a| a.username), Some("franndy".to_string()));

        assert!(repo.find_by_uuid("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let repo = setup_test_repo().await;
        let created = repo
            .create_or_update(&NewAgent::new("yyy-yyy-yyy", "fixture", "platzi", "test-host", 0))
            .await
            .unwrap();

        let found = repo.find_by_id(created.id).await.unwrap();
        assert_eq!(found, Some(created));

        assert!(repo.find_by_id(9_999).await.unwrap().is_none());
    }
}
