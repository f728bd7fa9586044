//! API layer - HTTP handlers and routing
//!
//! - Page routes (index)
//! - Authentication routes (login, logout)
//! - Status log routes (session required)

pub mod auth;
pub mod logs;
pub mod middleware;
pub mod pages;

use axum::{middleware as axum_middleware, Router};
use tower_http::trace::TraceLayer;

pub use middleware::{AppState, CurrentSession, WebError};

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    let protected_routes = logs::router().route_layer(axum_middleware::from_fn_with_state(
        state.clone(),
        middleware::require_session,
    ));

    Router::new()
        .merge(pages::router())
        .merge(auth::router())
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
