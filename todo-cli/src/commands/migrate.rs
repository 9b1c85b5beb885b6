//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;

use todo_server::ServiceConfig;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides the DB_* parts)
    #[arg(long)]
    pub database_url: Option<String>,
}

/// Apply the schema and exit
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let mut config = ServiceConfig::from_env().context("Failed to load configuration")?;
    if let Some(url) = args.database_url {
        config.database.url_override = Some(url);
    }

    tracing::info!(database = %config.database.display_target(), "Applying schema");
    todo_server::migrate(&config.database)
        .await
        .context("Migration failed")?;

    Ok(())
}
