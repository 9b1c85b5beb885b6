//! HTTP server command
//!
//! Loads configuration from the environment, applies flag overrides and
//! runs the service until shutdown.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use todo_server::ServiceConfig;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: BIND_ADDR or 0.0.0.0:8000)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Database URL (overrides the DB_* parts)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Disable request middleware and the startup connectivity check
    #[arg(long)]
    pub test_mode: bool,
}

impl ServeArgs {
    /// Environment config with command-line overrides applied.
    pub fn into_config(self, mut config: ServiceConfig) -> ServiceConfig {
        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(url) = self.database_url {
            config.database.url_override = Some(url);
        }
        config.test_mode |= self.test_mode;
        config
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let env_config = ServiceConfig::from_env().context("Failed to load configuration")?;
    let config = args.into_config(env_config);

    // Blocks until shutdown; startup failure exits non-zero
    todo_server::serve(config).await.context("Server error")?;

    Ok(())
}
