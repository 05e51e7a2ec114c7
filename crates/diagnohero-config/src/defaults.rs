//! Default value functions for serde deserialization.
//!
//! These functions forward to constants defined in `diagnohero_core::defaults`.

use diagnohero_core::defaults;

/// Generate default value functions that forward to diagnohero_core::defaults constants.
macro_rules! default_fns {
    // For Copy types (integers, bool, etc.)
    ($($fn_name:ident => $const_name:ident : $ty:ty),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> $ty {
                defaults::$const_name
            }
        )*
    };
}

/// Generate default value functions that return String from &str constants.
macro_rules! default_string_fns {
    ($($fn_name:ident => $const_name:ident),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> String {
                defaults::$const_name.to_string()
            }
        )*
    };
}

default_fns! {
    default_max_hearts            => DEFAULT_MAX_HEARTS: u32,
    default_seconds_per_heart     => DEFAULT_SECONDS_PER_HEART: u64,
    max_hearts_limit              => MAX_HEARTS_LIMIT: u32,
    default_shutdown_timeout_secs => DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64,
    default_stats_window_days     => DEFAULT_STATS_WINDOW_DAYS: u64,
    default_sql_max_connections   => DEFAULT_SQL_MAX_CONNECTIONS: u32,
    default_sql_min_connections   => DEFAULT_SQL_MIN_CONNECTIONS: u32,
    default_sql_connect_timeout_secs => DEFAULT_SQL_CONNECT_TIMEOUT_SECS: u64,
}

default_string_fns! {
    default_listen => DEFAULT_LISTEN,
}

pub(crate) fn default_true() -> bool {
    true
}
