//! Console logging for the todo service
//!
//! One compact line per event on stderr. The level comes from `RUST_LOG`
//! when set, otherwise `info` (or `debug` with `--debug`). At `info` the
//! service logs startup, each request's bodies (non-GET) and a completion
//! line carrying `transaction_id`, `endpoint`, `status` and `latency_ms`.
//! Targets are only printed with `--debug`.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Default to debug level instead of info
    pub debug: bool,
}

fn default_filter(config: &TracingConfig) -> EnvFilter {
    let level = if config.debug { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber.
pub fn init_tracing(config: &TracingConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(default_filter(config))
        .with_target(config.debug)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
