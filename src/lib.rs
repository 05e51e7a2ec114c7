//! # diagnohero
//!
//! Hearts, lection progress and study scheduling for the DiagnoHero quiz
//! platform.
//!
//! ## Crates
//!
//! - [`diagnohero_core`] - Shared defaults and error labels
//! - [`diagnohero_hearts`] - Heart regeneration engine
//! - [`diagnohero_store`] - Storage backends and the hearts service
//! - [`diagnohero_config`] - Configuration loading and validation
//! - [`diagnohero_metrics`] - Prometheus-compatible metrics
//! - [`diagnohero_server`] - HTTP service

pub use diagnohero_config as config;
pub use diagnohero_core as core;
pub use diagnohero_hearts as hearts;
pub use diagnohero_metrics as metrics;
pub use diagnohero_server as server;
pub use diagnohero_store as store;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use diagnohero_config::{Config, load_config, validate_config};
    pub use diagnohero_hearts::{HeartPolicy, LifeState, regenerate, time_until_next_heart};
    pub use diagnohero_server::{AppState, CancellationToken, ServerError, run, run_with_shutdown};
    pub use diagnohero_store::{HeartService, MemoryStore, Store, StoreError};
}
