//! Error types for todo-server startup and serving

use thiserror::Error;

use crate::config::ConfigError;
use crate::http::ServerError;
use crate::lifecycle::StartupError;

pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for running the service
#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("startup failed: {0}")]
    Startup(#[from] StartupError),

    #[error("server error: {0}")]
    Server(#[from] ServerError),
}
