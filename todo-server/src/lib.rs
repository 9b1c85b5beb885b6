//! todo-server: CRUD HTTP service for todo records
//!
//! Exposes list/read/create/update/delete endpoints over a Postgres table,
//! with per-request transaction ids, normalized endpoint logging and a
//! startup connectivity check.

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod models;

use std::sync::Arc;

pub use config::{ConfigError, DatabaseConfig, ServiceConfig};
pub use error::{Error, Result};
pub use http::{build_router, AppState};

use db::PgTodoRepo;
use lifecycle::RetryPolicy;

/// Apply the schema to the configured database.
pub async fn migrate(config: &DatabaseConfig) -> Result<()> {
    let pool = db::create_pool(config)?;
    db::migrations::run(&pool).await?;
    pool.close().await;
    Ok(())
}

/// Start the service: wait for the database, migrate, then serve.
pub async fn serve(config: ServiceConfig) -> Result<()> {
    tracing::info!(
        bind = %config.bind_addr,
        database = %config.database.display_target(),
        test_mode = config.test_mode,
        "Starting todo service"
    );

    let pool = db::create_pool(&config.database)?;
    let repo = Arc::new(PgTodoRepo::new(pool.clone()));

    lifecycle::startup(&config, repo.as_ref(), RetryPolicy::default()).await?;
    db::migrations::run(&pool).await?;

    let state = AppState::new(repo, config.test_mode);
    http::run_server(state, config.bind_addr).await?;

    pool.close().await;
    Ok(())
}
