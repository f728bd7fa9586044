//! Status log endpoints
//!
//! Both routes sit behind [`require_session`](crate::api::middleware::require_session).

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;

use crate::api::middleware::{AppState, CurrentSession, WebError};
use crate::services::LogServiceError;
use crate::theme::MessageKind;

#[derive(Debug, Default, Deserialize)]
pub struct LogForm {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub feeling: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/logs", get(list_logs).post(add_log))
}

/// POST /api/logs
async fn add_log(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Form(form): Form<LogForm>,
) -> Result<Response, WebError> {
    match state
        .log_service
        .add_log(&session.username, &form.status, &form.feeling)
        .await
    {
        Ok(message) => state.message(MessageKind::Success, &format!("Log {}", message)),
        Err(LogServiceError::ValidationError(_)) => {
            state.message(MessageKind::Error, "Please fill in status and feeling")
        }
        Err(e) => {
            tracing::error!("Failed to add log for '{}': {}", session.username, e);
            state.message(MessageKind::Error, "Failed to add log")
        }
    }
}

/// GET /api/logs
async fn list_logs(State(state): State<AppState>) -> Result<Response, WebError> {
    match state.log_service.fetch_logs().await {
        Ok(logs) => {
            let html = state.theme.render_logs(&logs)?;
            Ok(Html(html).into_response())
        }
        Err(e) => {
            tracing::error!("Failed to fetch logs: {}", e);
            state.message(MessageKind::Error, "Failed to fetch logs")
        }
    }
}
