//! Data models
//!
//! Plain data structures shared by the storage, service and HTTP layers:
//! - `User` (account with password hash)
//! - `Session` (authenticated browser/client)
//! - `LogEntry` (one status + feeling report)

mod log_entry;
mod session;
mod user;

pub use log_entry::{LogEntry, NewLogEntry};
pub use session::{Session, SESSION_TTL_HOURS};
pub use user::User;
