//! Configuration type definitions for server, hearts, store, auth, metrics, and logging.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::defaults::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub hearts: HeartsConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen address, e.g. 127.0.0.1:8080
    #[serde(default = "default_listen")]
    pub listen: String,
    /// Seconds to wait for in-flight requests on shutdown.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
    /// Window for quiz statistics, in days.
    #[serde(default = "default_stats_window_days")]
    pub stats_window_days: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
            stats_window_days: default_stats_window_days(),
        }
    }
}

/// Tunables of the hearts mechanic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartsConfig {
    #[serde(default = "default_max_hearts")]
    pub max_hearts: u32,
    #[serde(default = "default_seconds_per_heart")]
    pub seconds_per_heart: u64,
}

impl Default for HeartsConfig {
    fn default() -> Self {
        Self {
            max_hearts: default_max_hearts(),
            seconds_per_heart: default_seconds_per_heart(),
        }
    }
}

/// Which store implementation backs the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// In-process maps; state is lost on restart.
    #[default]
    Memory,
    /// SQL database via `database_url`.
    Sql,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Database URL (required for the sql backend).
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_sql_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_sql_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_sql_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Create missing tables on startup.
    #[serde(default = "default_true")]
    pub init_schema: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            database_url: None,
            max_connections: default_sql_max_connections(),
            min_connections: default_sql_min_connections(),
            connect_timeout_secs: default_sql_connect_timeout_secs(),
            init_schema: true,
        }
    }
}

/// Static bearer tokens mapped to user ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub sessions: Vec<SessionEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEntry {
    /// Bearer token presented in the `Authorization` header.
    pub token: String,
    /// User the token authenticates as.
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MetricsConfig {
    /// Prometheus exporter listen address; disabled when unset.
    pub listen: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: Option<String>,
    /// Log format: json, pretty, or compact. Default: pretty.
    pub format: Option<String>,
    /// Output target: stdout or stderr. Default: stderr.
    pub output: Option<String>,
    /// Per-module log level filters (e.g., {"diagnohero_store": "debug", "sqlx": "warn"}).
    #[serde(default)]
    pub filters: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.server.listen, "127.0.0.1:8080");
        assert_eq!(cfg.server.stats_window_days, 90);
        assert_eq!(cfg.hearts.max_hearts, 5);
        assert_eq!(cfg.hearts.seconds_per_heart, 3600);
        assert_eq!(cfg.store.backend, StoreBackend::Memory);
        assert!(cfg.store.init_schema);
        assert!(cfg.auth.sessions.is_empty());
        assert!(cfg.metrics.listen.is_none());
    }

    #[test]
    fn empty_document_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.server.listen, "127.0.0.1:8080");
        assert_eq!(cfg.hearts, HeartsConfig::default());
    }

    #[test]
    fn store_deserialize_sql() {
        let toml_str = r#"
backend = "sql"
database_url = "sqlite:diagnohero.db"
max_connections = 4
"#;
        let cfg: StoreConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.backend, StoreBackend::Sql);
        assert_eq!(cfg.database_url.as_deref(), Some("sqlite:diagnohero.db"));
        assert_eq!(cfg.max_connections, 4);
        assert_eq!(cfg.min_connections, 1);
        assert!(cfg.init_schema);
    }

    #[test]
    fn unknown_backend_rejected() {
        let res: Result<StoreConfig, _> = toml::from_str(r#"backend = "redis""#);
        assert!(res.is_err());
    }

    #[test]
    fn logging_filters() {
        let toml_str = r#"
level = "debug"
format = "json"

[filters]
sqlx = "warn"
"#;
        let cfg: LoggingConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.level.as_deref(), Some("debug"));
        assert_eq!(cfg.filters.get("sqlx").map(String::as_str), Some("warn"));
    }
}
