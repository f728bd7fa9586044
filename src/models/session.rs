//! Session model

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Sessions are valid for this many hours after creation.
pub const SESSION_TTL_HOURS: i64 = 24;

/// Session entity for an authenticated client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque session token (also the registry key)
    pub token: String,
    /// Authenticated username
    pub username: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a session for `username` starting now
    pub fn new(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            username: username.into(),
            created_at: Utc::now(),
        }
    }

    /// Time-to-live measured from `created_at`
    pub fn ttl() -> Duration {
        Duration::hours(SESSION_TTL_HOURS)
    }

    /// Check if the session has expired as of `now`.
    ///
    /// Expiry is absolute from creation; a session exactly TTL old is still valid.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at > Self::ttl()
    }

    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
