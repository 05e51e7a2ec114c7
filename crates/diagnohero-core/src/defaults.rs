//! Default configuration values.
//!
//! Centralized default constants for use across all crates.

// ============================================================================
// Hearts
// ============================================================================

/// Maximum number of hearts a user can hold.
pub const DEFAULT_MAX_HEARTS: u32 = 5;
/// Seconds of wall-clock time needed to regenerate one heart (one per hour).
pub const DEFAULT_SECONDS_PER_HEART: u64 = 3600;
/// Upper bound accepted for `hearts.max_hearts`.
pub const MAX_HEARTS_LIMIT: u32 = 100;

// ============================================================================
// Server Defaults
// ============================================================================

/// Default HTTP listen address.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8080";
/// Default graceful shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;
/// Default window for quiz statistics, in days (roughly three months).
pub const DEFAULT_STATS_WINDOW_DAYS: u64 = 90;

// ============================================================================
// Store Defaults
// ============================================================================

/// Default maximum SQL pool connections.
pub const DEFAULT_SQL_MAX_CONNECTIONS: u32 = 10;
/// Default minimum SQL pool connections.
pub const DEFAULT_SQL_MIN_CONNECTIONS: u32 = 1;
/// Default SQL connect timeout in seconds.
pub const DEFAULT_SQL_CONNECT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Study Sessions
// ============================================================================

/// Maximum length of a study session title.
pub const MAX_SESSION_TITLE_LEN: usize = 200;
