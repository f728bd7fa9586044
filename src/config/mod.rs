//! Configuration management
//!
//! Configuration is loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with defaults. Session TTL, token
//! length and password hashing cost are compile-time constants and are not
//! configurable here.

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file path or connection URL (`:memory:` for a throwaway database)
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/snulog.db".to_string()
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Mark the session cookie `Secure` (HTTPS only).
    ///
    /// Only disable for local development over plain HTTP.
    #[serde(default = "default_secure_cookie")]
    pub secure_cookie: bool,
    /// Seconds between sweeps of expired sessions; 0 disables the sweep
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secure_cookie: default_secure_cookie(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

fn default_secure_cookie() -> bool {
    true
}

fn default_sweep_interval() -> u64 {
    3600
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },
}

impl Config {
    /// Load configuration from file
    ///
    /// A missing or empty file yields the default configuration.
    /// Invalid YAML is an error carrying the line and column.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables:
    /// - SNULOG_SERVER_HOST
    /// - SNULOG_SERVER_PORT
    /// - SNULOG_DATABASE_URL
    /// - SNULOG_AUTH_SECURE_COOKIE
    /// - SNULOG_AUTH_SWEEP_INTERVAL_SECONDS
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides; unparsable values are ignored
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("SNULOG_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("SNULOG_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }

        if let Ok(url) = std::env::var("SNULOG_DATABASE_URL") {
            self.database.url = url;
        }

        if let Ok(secure) = std::env::var("SNULOG_AUTH_SECURE_COOKIE") {
            if let Some(secure) = parse_bool(&secure) {
                self.auth.secure_cookie = secure;
            }
        }
        if let Ok(interval) = std::env::var("SNULOG_AUTH_SWEEP_INTERVAL_SECONDS") {
            if let Ok(interval) = interval.parse::<u64>() {
                self.auth.sweep_interval_seconds = interval;
            }
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Format YAML parsing error with location
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Tests that modify environment variables hold this lock.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
