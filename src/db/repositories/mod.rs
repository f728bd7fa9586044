//! Database repositories
//!
//! Each repository pairs a trait with a SQLx implementation and an
//! in-memory one for tests and database-less runs.

pub mod log_entry;
pub mod user;

pub use log_entry::{InMemoryLogRepository, LogRepository, SqlxLogRepository};
pub use user::{InMemoryUserRepository, SqlxUserRepository, UserRepository};
