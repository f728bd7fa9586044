//! Status log service

use crate::db::repositories::LogRepository;
use crate::models::{LogEntry, NewLogEntry};
use anyhow::Context;
use std::sync::Arc;

/// Confirmation returned after an entry is stored
pub const ADDED_MESSAGE: &str = "added successfully";

/// Error types for log operations
#[derive(Debug, thiserror::Error)]
pub enum LogServiceError {
    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Service for recording and listing status entries
pub struct LogService {
    repo: Arc<dyn LogRepository>,
}

impl LogService {
    pub fn new(repo: Arc<dyn LogRepository>) -> Self {
        Self { repo }
    }

    /// Record a status report for `user_name`, stamped with the current time
    pub async fn add_log(
        &self,
        user_name: &str,
        status: &str,
        feeling: &str,
    ) -> Result<String, LogServiceError> {
        if status.trim().is_empty() || feeling.trim().is_empty() {
            return Err(LogServiceError::ValidationError(
                "Status and feeling are required".to_string(),
            ));
        }

        let entry = NewLogEntry::now(user_name, status.trim(), feeling.trim());
        self.repo
            .save(&entry)
            .await
            .context("Failed to save log entry")?;

        tracing::debug!("Stored log entry for '{}'", user_name);
        Ok(ADDED_MESSAGE.to_string())
    }

    /// All entries, newest first
    pub async fn fetch_logs(&self) -> Result<Vec<LogEntry>, LogServiceError> {
        let logs = self
            .repo
            .find_all()
            .await
            .context("Failed to fetch log entries")?;
        Ok(logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::InMemoryLogRepository;

    fn setup() -> LogService {
        LogService::new(Arc::new(InMemoryLogRepository::new()))
    }

    #[tokio::test]
    async fn test_add_and_fetch() {
        let service = setup();
        let message = service.add_log("alice", "reviewing PRs", "🙂").await.unwrap();
        assert_eq!(message, ADDED_MESSAGE);

        let logs = service.fetch_logs().await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].user_name, "alice");
        assert_eq!(logs[0].status, "reviewing PRs");
        assert_eq!(logs[0].feeling, "🙂");
    }

    #[tokio::test]
    async fn test_add_requires_status_and_feeling() {
        let service = setup();
        assert!(matches!(
            service.add_log("alice", "", "🙂").await,
            Err(LogServiceError::ValidationError(_))
        ));
        assert!(matches!(
            service.add_log("alice", "working", "  ").await,
            Err(LogServiceError::ValidationError(_))
        ));
        assert!(service.fetch_logs().await.unwrap().is_empty());
    }
}
