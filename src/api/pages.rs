//! Page endpoints

use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};

use crate::api::middleware::{AppState, WebError};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

/// GET / - Index page, or a redirect to the login page
async fn index(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, WebError> {
    let Some(session) = state.auth.session_from_headers(&headers) else {
        return Ok(Redirect::to("/login").into_response());
    };

    let html = state.theme.render_index(&session.username)?;
    Ok(Html(html).into_response())
}
