//! User service
//!
//! Login/logout on top of the credential service, plus account provisioning.
//!
//! Login failures are reported uniformly: an unknown username and a wrong
//! password both yield [`UserServiceError::InvalidCredentials`], and the
//! unknown-username path still pays for one password verification.

use crate::db::repositories::UserRepository;
use crate::models::User;
use crate::services::auth::{AuthService, AuthServiceError};
use crate::services::password;
use anyhow::Context;
use std::sync::Arc;

/// Message shown for any failed login
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

/// Error types for user service operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// Unknown user or wrong password
    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,

    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// User already exists
    #[error("User already exists: {0}")]
    UserExists(String),

    /// Session could not be issued
    #[error(transparent)]
    Auth(#[from] AuthServiceError),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Login input data
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

impl LoginInput {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// User service for authentication flows
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    auth: Arc<AuthService>,
}

impl UserService {
    /// Create a new user service
    pub fn new(user_repo: Arc<dyn UserRepository>, auth: Arc<AuthService>) -> Self {
        Self { user_repo, auth }
    }

    /// The credential service this user service issues sessions from
    pub fn auth(&self) -> &Arc<AuthService> {
        &self.auth
    }

    /// Check credentials and start a session.
    ///
    /// Returns the new session token.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if username or password is empty
    /// - `InvalidCredentials` for an unknown user or a wrong password
    /// - `Auth` if no token could be generated
    /// - `InternalError` if the account lookup failed
    pub async fn login(&self, input: LoginInput) -> Result<String, UserServiceError> {
        if input.username.is_empty() || input.password.is_empty() {
            return Err(UserServiceError::ValidationError(
                "Username and password are required".to_string(),
            ));
        }

        let user = self
            .user_repo
            .get_by_username(&input.username)
            .await
            .context("Failed to look up user")?;

        let authenticated = match &user {
            Some(user) => self.auth.verify_password(&input.password, &user.password_hash),
            None => password::verify_dummy(&input.password),
        };

        if !authenticated {
            tracing::info!("Failed login attempt for '{}'", input.username);
            return Err(UserServiceError::InvalidCredentials);
        }

        let token = self.auth.create_session(&input.username)?;
        tracing::info!("User '{}' logged in", input.username);
        Ok(token)
    }

    /// End the session named by `token`. Unknown tokens are ignored.
    pub fn logout(&self, token: &str) {
        self.auth.delete_session(token);
    }

    /// Provision a new account
    ///
    /// # Errors
    ///
    /// - `ValidationError` if username or password is empty
    /// - `UserExists` if the username is taken
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, UserServiceError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(UserServiceError::ValidationError(
                "Username cannot be empty".to_string(),
            ));
        }
        if password.is_empty() {
            return Err(UserServiceError::ValidationError(
                "Password cannot be empty".to_string(),
            ));
        }

        if self
            .user_repo
            .get_by_username(username)
            .await
            .context("Failed to check username")?
            .is_some()
        {
            return Err(UserServiceError::UserExists(format!(
                "Username '{}' is already taken",
                username
            )));
        }

        let password_hash = self.auth.hash_password(password)?;
        let user = self
            .user_repo
            .create(username, &password_hash)
            .await
            .context("Failed to create user")?;

        tracing::info!("Created user '{}'", user.username);
        Ok(user)
    }
}
