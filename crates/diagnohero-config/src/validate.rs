//! Configuration validation logic.

use std::collections::HashSet;

use crate::Config;
use crate::defaults::max_hearts_limit;
use crate::loader::ConfigError;
use crate::types::StoreBackend;

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.listen.trim().is_empty() {
        return Err(ConfigError::Validation("server.listen is empty".into()));
    }
    if config.server.stats_window_days == 0 {
        return Err(ConfigError::Validation(
            "server.stats_window_days must be > 0".into(),
        ));
    }
    if config.hearts.max_hearts == 0 || config.hearts.max_hearts > max_hearts_limit() {
        return Err(ConfigError::Validation(format!(
            "hearts.max_hearts must be 1..={}",
            max_hearts_limit()
        )));
    }
    if config.hearts.seconds_per_heart == 0 {
        return Err(ConfigError::Validation(
            "hearts.seconds_per_heart must be > 0".into(),
        ));
    }
    if config.store.backend == StoreBackend::Sql {
        if config
            .store
            .database_url
            .as_deref()
            .unwrap_or("")
            .trim()
            .is_empty()
        {
            return Err(ConfigError::Validation(
                "store.database_url is required for the sql backend".into(),
            ));
        }
        if config.store.max_connections == 0 {
            return Err(ConfigError::Validation(
                "store.max_connections must be > 0".into(),
            ));
        }
        if config.store.min_connections > config.store.max_connections {
            return Err(ConfigError::Validation(
                "store.min_connections cannot be greater than store.max_connections".into(),
            ));
        }
    }
    let mut seen = HashSet::new();
    for entry in &config.auth.sessions {
        if entry.token.trim().is_empty() {
            return Err(ConfigError::Validation(
                "auth.sessions: token is empty".into(),
            ));
        }
        if entry.user_id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "auth.sessions: user_id is empty".into(),
            ));
        }
        if !seen.insert(entry.token.as_str()) {
            return Err(ConfigError::Validation(format!(
                "auth.sessions: duplicate token for user '{}'",
                entry.user_id
            )));
        }
    }
    if let Some(format) = config.logging.format.as_deref()
        && !matches!(format, "json" | "pretty" | "compact")
    {
        return Err(ConfigError::Validation(
            "logging.format must be one of: json, pretty, compact".into(),
        ));
    }
    if let Some(output) = config.logging.output.as_deref()
        && !matches!(output, "stdout" | "stderr")
    {
        return Err(ConfigError::Validation(
            "logging.output must be 'stdout' or 'stderr'".into(),
        ));
    }
    Ok(())
}
