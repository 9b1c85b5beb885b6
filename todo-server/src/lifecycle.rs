//! Startup lifecycle - wait for the database before serving traffic
//!
//! The probe is retried a fixed number of times with a fixed delay.
//! Test mode skips the whole check.

use std::time::Duration;

use crate::config::ServiceConfig;
use crate::db::{DbError, TodoRepository};

/// Attempts made before startup gives up
pub const DEFAULT_ATTEMPTS: u32 = 5;

/// Delay between attempts
pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

/// Fixed-delay retry policy for the startup probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            delay: DEFAULT_DELAY,
        }
    }
}

/// Startup failure
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("database unreachable after {attempts} attempts: {source}")]
    DatabaseUnavailable {
        attempts: u32,
        #[source]
        source: DbError,
    },
}

/// Probe the repository until it answers or the policy is exhausted.
///
/// Returns the number of attempts it took.
pub async fn wait_for_database<R>(repo: &R, policy: RetryPolicy) -> Result<u32, StartupError>
where
    R: TodoRepository + ?Sized,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;

    loop {
        match repo.ping().await {
            Ok(()) => {
                tracing::info!(attempt, "Database connection established");
                return Ok(attempt);
            }
            Err(err) if attempt < attempts => {
                tracing::warn!(
                    attempt,
                    max_attempts = attempts,
                    error = %err,
                    "Database not reachable, retrying in {:?}",
                    policy.delay
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(err) => {
                tracing::error!(attempts, error = %err, "Database not reachable, giving up");
                return Err(StartupError::DatabaseUnavailable {
                    attempts,
                    source: err,
                });
            }
        }
    }
}

/// Run startup checks for a configuration. Skipped entirely in test mode.
pub async fn startup<R>(config: &ServiceConfig, repo: &R, policy: RetryPolicy) -> Result<(), StartupError>
where
    R: TodoRepository + ?Sized,
{
    if config.test_mode {
        tracing::info!("Test mode enabled, skipping database startup check");
        return Ok(());
    }

    tracing::info!(
        target_db = %config.database.display_target(),
        "Checking database connectivity"
    );
    wait_for_database(repo, policy).await.map(|_| ())
}
