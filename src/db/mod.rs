//! Database layer
//!
//! SQLite storage for accounts and status logs.
//!
//! # Usage
//!
//! ```ignore
//! use snulog::config::DatabaseConfig;
//! use snulog::db::{create_pool, migrations};
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! migrations::run_migrations(&pool).await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool, ping};
