//! Provision a login account in the configured database.
//!
//! Usage: `snulog-add-user <username> <password>`

use anyhow::{bail, Result};
use std::path::Path;
use std::sync::Arc;

use snulog::{
    config::Config,
    db::{self, repositories::SqlxUserRepository},
    services::{AuthService, UserService},
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snulog=warn".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [username, password] = args.as_slice() else {
        bail!("usage: snulog-add-user <username> <password>");
    };

    let config = Config::load_with_env(Path::new("config.yml"))?;
    let pool = db::create_pool(&config.database).await?;
    db::migrations::run_migrations(&pool).await?;

    let users = UserService::new(
        SqlxUserRepository::boxed(pool.clone()),
        Arc::new(AuthService::new()),
    );
    let user = users.create_user(username, password).await?;

    println!("Created user '{}' (id {})", user.username, user.id);
    Ok(())
}
