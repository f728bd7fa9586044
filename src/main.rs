//! snulog - A small team status log

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snulog::{
    api::{self, AppState},
    config::Config,
    db::{
        self,
        repositories::{SqlxLogRepository, SqlxUserRepository},
    },
    services::{AuthService, LogService, UserService},
    theme::ThemeEngine,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snulog=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting snulog...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    db::ping(&pool).await?;
    tracing::info!("Database connected: {}", config.database.url);

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Create repositories
    let user_repo = SqlxUserRepository::boxed(pool.clone());
    let log_repo = SqlxLogRepository::boxed(pool.clone());

    // Initialize services
    let auth = Arc::new(AuthService::with_secure_cookie(config.auth.secure_cookie));
    let user_service = Arc::new(UserService::new(user_repo, auth.clone()));
    let log_service = Arc::new(LogService::new(log_repo));

    let theme = Arc::new(ThemeEngine::new()?);
    tracing::info!("Templates loaded");

    let state = AppState {
        auth: auth.clone(),
        user_service,
        log_service,
        theme,
    };

    // Periodic sweep of expired sessions; lookups enforce the TTL regardless
    if config.auth.sweep_interval_seconds > 0 {
        let auth = auth.clone();
        let period = tokio::time::Duration::from_secs(config.auth.sweep_interval_seconds);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let removed = auth.purge_expired();
                if removed > 0 {
                    tracing::debug!("Swept {} expired sessions", removed);
                }
            }
        });
    }

    // Build router
    let app = api::build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
