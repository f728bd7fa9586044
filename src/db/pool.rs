//! Database connection pool
//!
//! Creates the SQLite pool from configuration. File-backed databases get
//! their parent directory created on demand; `:memory:` is supported for
//! tests.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::config::DatabaseConfig;

/// Maximum pooled connections
const MAX_CONNECTIONS: u32 = 20;

/// Turn a configured URL or file path into a sqlx connection URL
fn connection_url(url: &str) -> String {
    if url == ":memory:" {
        "sqlite::memory:".to_string()
    } else if url.starts_with("sqlite:") {
        if url.contains('?') || url.starts_with("sqlite::memory:") {
            url.to_string()
        } else {
            format!("{}?mode=rwc", url)
        }
    } else {
        format!("sqlite:{}?mode=rwc", url)
    }
}

/// Create the parent directory of a file-backed database
fn ensure_parent_dir(url: &str) -> Result<()> {
    if url.starts_with(":memory:") || url.starts_with("sqlite::memory:") {
        return Ok(());
    }

    let path = url.trim_start_matches("sqlite:");
    let path = path.split('?').next().unwrap_or(path);
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
        }
    }
    Ok(())
}

/// Create a SQLite connection pool from configuration.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the connection
/// cannot be established.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool> {
    ensure_parent_dir(&config.url)?;

    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(&connection_url(&config.url))
        .await
        .with_context(|| format!("Failed to connect to SQLite database: {}", config.url))?;

    Ok(pool)
}

/// Create an in-memory pool for tests
pub async fn create_test_pool() -> Result<SqlitePool> {
    let config = DatabaseConfig {
        url: ":memory:".to_string(),
    };
    create_pool(&config).await
}

/// Check that the database answers
pub async fn ping(pool: &SqlitePool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .context("Database ping failed")?;
    Ok(())
}
