//! API middleware
//!
//! - Shared application state
//! - Session resolution for protected routes
//! - Error and message-fragment responses

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;

use crate::models::Session;
use crate::services::{AuthService, LogService, UserService};
use crate::theme::{MessageKind, ThemeEngine, ThemeError};

/// Shown when a protected route is hit without a valid session
pub const LOGIN_REQUIRED_MESSAGE: &str = "Login required";

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub log_service: Arc<LogService>,
    pub theme: Arc<ThemeEngine>,
}

impl AppState {
    /// Render a feedback fragment for htmx to swap in
    pub fn message(&self, kind: MessageKind, message: &str) -> Result<Response, WebError> {
        let html = self.theme.render_message(kind, message)?;
        Ok(Html(html).into_response())
    }
}

/// Session resolved by [`require_session`]
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

/// Errors that end a request with a generic 500
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error(transparent)]
    Template(#[from] ThemeError),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}

/// Session middleware for protected routes
///
/// Requests without a live session get the "login required" fragment
/// instead of reaching the handler.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let Some(session) = state.auth.session_from_headers(request.headers()) else {
        return state.message(MessageKind::Error, LOGIN_REQUIRED_MESSAGE);
    };

    request.extensions_mut().insert(CurrentSession(session));
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentSession>()
            .cloned()
            .ok_or((StatusCode::UNAUTHORIZED, "Authentication required"))
    }
}
