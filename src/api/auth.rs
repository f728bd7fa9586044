//! Authentication endpoints
//!
//! - GET /login - Login page
//! - POST /login - Verify credentials and issue the session cookie
//! - GET|POST /logout - End the session and clear the cookie

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderName},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;

use crate::api::middleware::{AppState, WebError};
use crate::services::auth::{cookie_value, SESSION_COOKIE_NAME};
use crate::services::user::{LoginInput, UserServiceError, INVALID_CREDENTIALS_MESSAGE};
use crate::theme::MessageKind;

/// htmx client-side redirect header
pub const HX_REDIRECT: HeaderName = HeaderName::from_static("hx-redirect");

const MISSING_CREDENTIALS_MESSAGE: &str = "Please enter username and password";
const LOGIN_FAILED_MESSAGE: &str = "Login failed";

/// Login form body
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout).post(logout))
}

/// GET /login
async fn login_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    if state.auth.session_from_headers(&headers).is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let html = state.theme.render_login()?;
    Ok(Html(html).into_response())
}

/// POST /login
///
/// Failures come back as a message fragment. Unknown users and wrong
/// passwords get the same text.
async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, WebError> {
    let input = LoginInput::new(form.username, form.password);

    let token = match state.user_service.login(input).await {
        Ok(token) => token,
        Err(UserServiceError::ValidationError(_)) => {
            return state.message(MessageKind::Error, MISSING_CREDENTIALS_MESSAGE);
        }
        Err(UserServiceError::InvalidCredentials) => {
            return state.message(MessageKind::Error, INVALID_CREDENTIALS_MESSAGE);
        }
        Err(e) => {
            tracing::error!("Login failed: {}", e);
            return state.message(MessageKind::Error, LOGIN_FAILED_MESSAGE);
        }
    };

    Ok((
        [
            (header::SET_COOKIE, state.auth.session_cookie(&token)),
            (HX_REDIRECT, "/".to_string()),
        ],
        Html(String::new()),
    )
        .into_response())
}

/// GET|POST /logout
async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = cookie_value(&headers, SESSION_COOKIE_NAME) {
        state.user_service.logout(token);
    }

    (
        [(header::SET_COOKIE, state.auth.clear_session_cookie())],
        Redirect::to("/login"),
    )
        .into_response()
}
