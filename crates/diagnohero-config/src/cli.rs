//! CLI override definitions and application logic.

use clap::Parser;

use crate::Config;
use crate::types::StoreBackend;

#[derive(Debug, Clone, Parser, Default)]
pub struct CliOverrides {
    /// Override HTTP listen address, e.g. 0.0.0.0:8080
    #[arg(long)]
    pub listen: Option<String>,
    /// Override maximum hearts per user
    #[arg(long)]
    pub max_hearts: Option<u32>,
    /// Override seconds needed to regenerate one heart
    #[arg(long)]
    pub seconds_per_heart: Option<u64>,
    /// Override store backend (memory, sql)
    #[arg(long, value_enum)]
    pub store: Option<StoreBackend>,
    /// Override database URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
    /// Override metrics listen address
    #[arg(long)]
    pub metrics_listen: Option<String>,
    /// Override log level (trace/debug/info/warn/error)
    #[arg(long)]
    pub log_level: Option<String>,
    /// Override log format (json/pretty/compact)
    #[arg(long)]
    pub log_format: Option<String>,
}

pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) {
    if let Some(v) = &overrides.listen {
        config.server.listen = v.clone();
    }
    if let Some(v) = overrides.max_hearts {
        config.hearts.max_hearts = v;
    }
    if let Some(v) = overrides.seconds_per_heart {
        config.hearts.seconds_per_heart = v;
    }
    if let Some(v) = overrides.store {
        config.store.backend = v;
    }
    if let Some(v) = &overrides.database_url {
        config.store.database_url = Some(v.clone());
    }
    if let Some(v) = &overrides.metrics_listen {
        config.metrics.listen = Some(v.clone());
    }
    if let Some(v) = &overrides.log_level {
        config.logging.level = Some(v.clone());
    }
    if let Some(v) = &overrides.log_format {
        config.logging.format = Some(v.clone());
    }
}
