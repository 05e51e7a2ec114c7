//! Configuration loading and CLI definitions.
//!
//! A configuration file may be JSON (comments allowed), YAML or TOML. Every
//! section is optional; missing values fall back to
//! `diagnohero_core::defaults`.
//!
//! ```toml
//! [server]
//! listen = "0.0.0.0:8080"
//!
//! [hearts]
//! max_hearts = 5
//! seconds_per_heart = 3600
//!
//! [store]
//! backend = "sql"
//! database_url = "sqlite:diagnohero.db"
//!
//! [[auth.sessions]]
//! token = "secret-token"
//! user_id = "student-1"
//! ```

mod cli;
mod defaults;
mod loader;
mod types;
mod validate;

pub use cli::{CliOverrides, apply_overrides};
pub use loader::{ConfigError, load_config};
pub use types::*;
pub use validate::validate_config;
