//! Status log entry model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored status report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub user_name: String,
    pub status: String,
    pub feeling: String,
    pub timestamp: DateTime<Utc>,
}

/// Input for saving a new entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLogEntry {
    pub user_name: String,
    pub status: String,
    pub feeling: String,
    pub timestamp: DateTime<Utc>,
}

impl NewLogEntry {
    /// Build an entry stamped with the current time
    pub fn now(
        user_name: impl Into<String>,
        status: impl Into<String>,
        feeling: impl Into<String>,
    ) -> Self {
        Self {
            user_name: user_name.into(),
            status: status.into(),
            feeling: feeling.into(),
            timestamp: Utc::now(),
        }
    }
}
