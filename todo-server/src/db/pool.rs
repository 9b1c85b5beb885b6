//! Database connection pool management
//!
//! Uses sqlx PgPool sized from `DatabaseConfig`:
//! `pool_size` connections are kept warm, up to `max_overflow` more are
//! opened under load, and connections are recycled after `pool_recycle`.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::config::DatabaseConfig;

/// How long a request waits for a free connection before failing.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the pool options for a configuration.
fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .min_connections(config.pool_size.min(config.max_connections()))
        .max_connections(config.max_connections())
        .max_lifetime(config.pool_recycle)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .test_before_acquire(true)
}

/// Connection options for a configuration.
///
/// `DATABASE_URL` is parsed as-is. Otherwise the options are built from the
/// individual parts, so user names and passwords never pass through a URL
/// and need no percent-encoding.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` cannot be parsed.
pub fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, sqlx::Error> {
    if let Some(url) = &config.url_override {
        return url.parse();
    }

    let options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .database(&config.name);

    if config.password.is_empty() {
        Ok(options)
    } else {
        Ok(options.password(&config.password))
    }
}

/// Create a PostgreSQL connection pool without connecting.
///
/// Connections are opened on first use, so startup can decide how to
/// retry connectivity (see [`crate::lifecycle`]).
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` cannot be parsed.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&config.database)?;
/// ```
pub fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    Ok(pool_options(config).connect_lazy_with(connect_options(config)?))
}

/// Create a connected pool for a URL using the default pool settings.
///
/// # Errors
///
/// Returns an error if the connection fails.
pub async fn create_pool_with_url(database_url: &str) -> Result<PgPool, sqlx::Error> {
    pool_options(&DatabaseConfig::default())
        .connect(database_url)
        .await
}
