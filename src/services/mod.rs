//! Services layer - Business logic
//!
//! - `auth`: credential service (passwords, session tokens, session registry, cookies)
//! - `password`: Argon2id hashing
//! - `user`: login/logout and account provisioning
//! - `log_entry`: status log entries

pub mod auth;
pub mod log_entry;
pub mod password;
pub mod user;

pub use auth::{generate_session_token, AuthService, AuthServiceError, SessionRegistry};
pub use log_entry::{LogService, LogServiceError};
pub use password::{hash_password, verify_password};
pub use user::{LoginInput, UserService, UserServiceError};
