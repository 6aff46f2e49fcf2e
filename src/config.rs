//! Configuration loading and constants.
//!
//! Loads optional settings from a TOML file, then applies the process environment
//! (`SQL_CONNECTION_STRING`, `PORT`). Also defines response messages, HTTP cache
//! headers, timeouts, and default log settings. `AppConfig` is the root struct.

use const_format::formatcp;
use serde::Deserialize;
use std::path::Path;

// =============================================================================
// Environment
// =============================================================================

/// Environment variable holding the store connection string
pub const ENV_CONNECTION_STRING: &str = "SQL_CONNECTION_STRING";

/// Environment variable overriding the listen port
pub const ENV_PORT: &str = "PORT";

// =============================================================================
// HTTP Server Defaults
// =============================================================================

/// Default bind address
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_HTTP_PORT: u16 = 3000;

/// Seconds to wait for in-flight requests on shutdown
pub const SHUTDOWN_GRACE_SECS: u64 = 30;

// =============================================================================
// HTTP Response Cache Control
// =============================================================================
// Every quote response is a fresh pick and every health response reflects the
// store right now, so neither may be served from an upstream cache.

/// Quote page
pub const CACHE_CONTROL_QUOTE: &str = "no-store";

/// Health probe
pub const CACHE_CONTROL_HEALTH: &str = "no-store";

// =============================================================================
// Database Defaults
// =============================================================================

/// Per-query timeout in seconds
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 5;

/// Maximum pooled connections
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

// =============================================================================
// Response Messages
// =============================================================================

pub const MSG_CONFIGURATION_ERROR: &str = "Configuration error.";
pub const MSG_NO_QUOTES: &str = "No quotes found.";
pub const MSG_QUOTE_ERROR: &str = "Error retrieving quote.";
pub const MSG_INTERNAL_ERROR: &str = "Internal server error.";
pub const MSG_NOT_FOUND: &str = "Not found.";

/// Health reason when the connection string is absent
pub const HEALTH_REASON_MISSING_CONFIG: &str = formatcp!("{} is missing", ENV_CONNECTION_STRING);

/// Health reason when the connection string cannot be parsed
pub const HEALTH_REASON_INVALID_CONFIG: &str = formatcp!("{} is invalid", ENV_CONNECTION_STRING);

/// Health reason when the probe query fails
pub const HEALTH_REASON_DB_FAILED: &str = "DB check failed";

// =============================================================================
// Default Strings
// =============================================================================

/// Default log filter when neither --log-level nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "quote_service=info,tower_http=info";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Name of the built-in quote template
pub const QUOTE_TEMPLATE: &str = "quote.html";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Store access settings
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Store connection string, only ever taken from the environment
    #[serde(skip)]
    pub connection_string: Option<String>,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }
}

/// How a random quote is picked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// Count rows, then fetch one at a random offset ordered by id
    #[default]
    Offset,
    /// Let the database shuffle the whole table and take the first row
    RandomOrder,
}

/// Store access settings
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Timeout applied to every query and to pool acquisition
    #[serde(default = "DatabaseConfig::default_query_timeout")]
    pub query_timeout_seconds: u64,
    /// Upper bound on pooled connections
    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,
    #[serde(default)]
    pub selection: SelectionStrategy,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            query_timeout_seconds: Self::default_query_timeout(),
            max_connections: Self::default_max_connections(),
            selection: SelectionStrategy::default(),
        }
    }
}

impl DatabaseConfig {
    fn default_query_timeout() -> u64 {
        DEFAULT_QUERY_TIMEOUT_SECS
    }

    fn default_max_connections() -> u32 {
        DEFAULT_MAX_CONNECTIONS
    }

    pub fn query_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.query_timeout_seconds)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    /// Load configuration from an optional TOML file and the process environment.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_env(|key| std::env::var(key).ok())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`.
    ///
    /// Empty values are treated as absent, so an empty `PORT` keeps the default.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.connection_string = lookup(ENV_CONNECTION_STRING)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        if let Some(port) = lookup(ENV_PORT)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
        {
            self.http.port = port.parse().map_err(|_| {
                ConfigError::Validation(format!("{} must be a port number, got {:?}", ENV_PORT, port))
            })?;
        }

        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.query_timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "database.query_timeout_seconds must be greater than zero".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "database.max_connections must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
