//! Service configuration - database settings and runtime toggles
//!
//! Configuration is loaded from environment variables once at startup and
//! passed explicitly to the components that need it:
//! - `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`: connection parts
//! - `DB_POOL_SIZE`, `DB_MAX_OVERFLOW`, `DB_POOL_RECYCLE`: pool tuning
//! - `DATABASE_URL`: full connection URL, overrides the individual parts
//! - `TEST_MODE`: disables request middleware and the startup retry loop
//! - `BIND_ADDR`: listen address (default: 0.0.0.0:8000)

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

/// Configuration error - names the offending variable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value for {var}: '{value}'")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
}

/// Database connection and pool settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    /// Connections kept open in steady state
    pub pool_size: u32,
    /// Extra connections allowed above `pool_size` under load
    pub max_overflow: u32,
    /// Connections older than this are closed and replaced
    pub pool_recycle: Duration,
    /// Full URL; when set, the individual parts are ignored
    pub url_override: Option<String>,
}

impl DatabaseConfig {
    /// Upper bound on open connections.
    pub fn max_connections(&self) -> u32 {
        self.pool_size.saturating_add(self.max_overflow).max(1)
    }

    /// Target used in log lines; never includes the password.
    pub fn display_target(&self) -> String {
        match &self.url_override {
            Some(_) => "DATABASE_URL".to_string(),
            None => format!("{}:{}/{}", self.host, self.port, self.name),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            name: "todo".to_string(),
            pool_size: 5,
            max_overflow: 10,
            pool_recycle: Duration::from_secs(3600),
            url_override: None,
        }
    }
}

/// Top-level service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Address to bind to (default: 0.0.0.0:8000)
    pub bind_addr: SocketAddr,
    pub database: DatabaseConfig,
    /// Disables request middleware and the startup retry loop
    pub test_mode: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            database: DatabaseConfig::default(),
            test_mode: false,
        }
    }
}

impl ServiceConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup (for testing)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let db = defaults.database;

        let database = DatabaseConfig {
            host: lookup("DB_HOST").unwrap_or(db.host),
            port: parse_or(&lookup, "DB_PORT", db.port)?,
            user: lookup("DB_USER").unwrap_or(db.user),
            password: lookup("DB_PASSWORD").unwrap_or(db.password),
            name: lookup("DB_NAME").unwrap_or(db.name),
            pool_size: parse_or(&lookup, "DB_POOL_SIZE", db.pool_size)?,
            max_overflow: parse_or(&lookup, "DB_MAX_OVERFLOW", db.max_overflow)?,
            pool_recycle: Duration::from_secs(parse_or(
                &lookup,
                "DB_POOL_RECYCLE",
                db.pool_recycle.as_secs(),
            )?),
            url_override: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
        };

        let test_mode = match lookup("TEST_MODE") {
            Some(value) => parse_flag(&value).ok_or(ConfigError {
                var: "TEST_MODE",
                value,
            })?,
            None => false,
        };

        Ok(Self {
            bind_addr: parse_or(&lookup, "BIND_ADDR", defaults.bind_addr)?,
            database,
            test_mode,
        })
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError { var, value }),
        None => Ok(default),
    }
}

/// Parse a boolean flag the way shell users write them.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
