//! Error type constants for metrics and logging.
//!
//! These constants provide consistent error classification across all crates.

/// Storage backend error.
pub const ERROR_STORE: &str = "store";
/// Conditional update lost to a concurrent writer twice in a row.
pub const ERROR_CONFLICT: &str = "conflict";
/// Request rejected by input validation.
pub const ERROR_VALIDATION: &str = "validation";
/// Missing or unknown session.
pub const ERROR_UNAUTHORIZED: &str = "unauthorized";
/// Entity not found.
pub const ERROR_NOT_FOUND: &str = "not_found";
/// Configuration error.
pub const ERROR_CONFIG: &str = "config";
/// I/O error.
pub const ERROR_IO: &str = "io";
