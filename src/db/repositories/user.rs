//! User repository
//!
//! Account lookup for the login flow:
//! - `UserRepository` trait
//! - `SqlxUserRepository` backed by SQLite
//! - `InMemoryUserRepository` backed by a map

use crate::models::User;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new account. The password must already be hashed.
    async fn create(&self, username: &str, password_hash: &str) -> Result<User>;

    /// Get user by username; `None` when no such account exists
    async fn get_by_username(&self, username: &str) -> Result<Option<User>>;
}

/// SQLx-based user repository
pub struct SqlxUserRepository {
    pool: SqlitePool,
}

impl SqlxUserRepository {
    /// Create a new SQLx user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn UserRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create(&self, username: &str, password_hash: &str) -> Result<User> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create user")?;

        Ok(User {
            id: result.last_insert_rowid(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
        })
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get user by username")?;

        Ok(row.map(|row| User {
            id: row.get("id"),
            username: row.get("username"),
            password_hash: row.get("password_hash"),
            created_at: row.get("created_at"),
        }))
    }
}

/// In-memory user repository
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, username: &str, password_hash: &str) -> Result<User> {
        let mut users = self.users.write().await;
        if users.contains_key(username) {
            anyhow::bail!("Username '{}' already exists", username);
        }

        let mut user = User::new(username, password_hash);
        user.id = users.len() as i64 + 1;
        users.insert(username.to_string(), user.clone());
        Ok(user)
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.get(username).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> SqlxUserRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxUserRepository::new(pool)
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let repo = setup_test_repo().await;

        let created = repo.create("alice", "$argon2id$hash").await.expect("Failed to create user");
        assert!(created.id > 0);

        let found = repo
            .get_by_username("alice")
            .await
            .unwrap()
            .expect("user should exist");
        assert_eq!(found.id, created.id);
        assert_eq!(found.password_hash, "$argon2id$hash");
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let repo = setup_test_repo().await;
        assert!(repo.get_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_fails() {
        let repo = setup_test_repo().await;
        repo.create("alice", "hash1").await.unwrap();
        assert!(repo.create("alice", "hash2").await.is_err());
    }

    #[tokio::test]
    async fn test_in_memory_repository() {
        let repo = InMemoryUserRepository::new();
        repo.create("bob", "hash").await.unwrap();

        assert_eq!(repo.get_by_username("bob").await.unwrap().unwrap().username, "bob");
        assert!(repo.get_by_username("carol").await.unwrap().is_none());
        assert!(repo.create("bob", "other").await.is_err());
    }
}
