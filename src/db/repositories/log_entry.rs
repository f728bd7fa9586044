//! Status log repository

use crate::models::{LogEntry, NewLogEntry};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Log repository trait
#[async_trait]
pub trait LogRepository: Send + Sync {
    /// Save a new entry
    async fn save(&self, entry: &NewLogEntry) -> Result<LogEntry>;

    /// All entries, newest first
    async fn find_all(&self) -> Result<Vec<LogEntry>>;
}

/// SQLx-based log repository
pub struct SqlxLogRepository {
    pool: SqlitePool,
}

impl SqlxLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn LogRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl LogRepository for SqlxLogRepository {
    async fn save(&self, entry: &NewLogEntry) -> Result<LogEntry> {
        let result = sqlx::query(
            r#"
            INSERT INTO logs (user_name, status, feeling, timestamp)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&entry.user_name)
        .bind(&entry.status)
        .bind(&entry.feeling)
        .bind(entry.timestamp)
        .execute(&self.pool)
        .await
        .context("Failed to save log entry")?;

        Ok(LogEntry {
            id: result.last_insert_rowid(),
            user_name: entry.user_name.clone(),
            status: entry.status.clone(),
            feeling: entry.feeling.clone(),
            timestamp: entry.timestamp,
        })
    }

    async fn find_all(&self) -> Result<Vec<LogEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_name, status, feeling, timestamp
            FROM logs
            ORDER BY timestamp DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch log entries")?;

        Ok(rows
            .iter()
            .map(|row| LogEntry {
                id: row.get("id"),
                user_name: row.get("user_name"),
                status: row.get("status"),
                feeling: row.get("feeling"),
                timestamp: row.get("timestamp"),
            })
            .collect())
    }
}

/// In-memory log repository
#[derive(Default)]
pub struct InMemoryLogRepository {
    logs: RwLock<Vec<LogEntry>>,
}

impl InMemoryLogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LogRepository for InMemoryLogRepository {
    async fn save(&self, entry: &NewLogEntry) -> Result<LogEntry> {
        let mut logs = self.logs.write().await;
        let saved = LogEntry {
            id: logs.len() as i64 + 1,
            user_name: entry.user_name.clone(),
            status: entry.status.clone(),
            feeling: entry.feeling.clone(),
            timestamp: entry.timestamp,
        };
        logs.push(saved.clone());
        Ok(saved)
    }

    async fn find_all(&self) -> Result<Vec<LogEntry>> {
        let mut logs = self.logs.read().await.clone();
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};
    use chrono::{Duration, Utc};

    fn entry_at(user: &str, status: &str, minutes_ago: i64) -> NewLogEntry {
        NewLogEntry {
            user_name: user.to_string(),
            status: status.to_string(),
            feeling: "😀".to_string(),
            timestamp: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    async fn assert_newest_first(repo: &dyn LogRepository) {
        repo.save(&entry_at("alice", "older", 10)).await.unwrap();
        repo.save(&entry_at("bob", "newest", 0)).await.unwrap();
        repo.save(&entry_at("carol", "middle", 5)).await.unwrap();

        let statuses: Vec<String> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|entry| entry.status)
            .collect();
        assert_eq!(statuses, vec!["newest", "middle", "older"]);
    }

    #[tokio::test]
    async fn test_sqlx_find_all_newest_first() {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        assert_newest_first(&SqlxLogRepository::new(pool)).await;
    }

    #[tokio::test]
    async fn test_in_memory_find_all_newest_first() {
        assert_newest_first(&InMemoryLogRepository::new()).await;
    }

    #[tokio::test]
    async fn test_sqlx_save_round_trips_fields() {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        let repo = SqlxLogRepository::new(pool);

        let saved = repo.save(&entry_at("alice", "writing docs", 1)).await.unwrap();
        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 1);

        let loaded = &all[0];
        assert_eq!(loaded.id, saved.id);
        assert_eq!(loaded.user_name, "alice");
        assert_eq!(loaded.status, "writing docs");
        assert_eq!(loaded.feeling, "😀");
        assert_eq!(loaded.timestamp.timestamp(), saved.timestamp.timestamp());
    }
}
