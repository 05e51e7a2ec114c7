//! Metrics collection and Prometheus exporter for diagnohero.
//!
//! This module provides metrics instrumentation for the hearts service,
//! including heart spending and regeneration, store conflicts, request
//! counts and error rates.

use std::net::SocketAddr;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Initialize Prometheus metrics exporter.
///
/// Starts an HTTP server on the given address to expose metrics.
/// Returns an error message if binding fails.
pub fn init_prometheus(listen: &str) -> Result<(), String> {
    let addr: SocketAddr = listen
        .parse()
        .map_err(|e| format!("invalid metrics listen address: {}", e))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("failed to install prometheus exporter: {}", e))?;

    Ok(())
}

// ============================================================================
// Metric Names
// ============================================================================

/// Total number of hearts spent on incorrect answers.
pub const HEARTS_SPENT_TOTAL: &str = "diagnohero_hearts_spent_total";
/// Total number of hearts regenerated by lazy settlement.
pub const HEARTS_REGENERATED_TOTAL: &str = "diagnohero_hearts_regenerated_total";
/// Total number of spend attempts rejected because no hearts were left.
pub const HEARTS_EXHAUSTED_TOTAL: &str = "diagnohero_hearts_exhausted_total";
/// Total number of conditional updates lost to a concurrent writer.
pub const STORE_CONFLICTS_TOTAL: &str = "diagnohero_store_conflicts_total";
/// Total number of quiz answers recorded (label: "correct").
pub const ANSWERS_TOTAL: &str = "diagnohero_answers_total";
/// Total number of premium upgrades.
pub const PREMIUM_UPGRADES_TOTAL: &str = "diagnohero_premium_upgrades_total";
/// Total number of HTTP requests (labels: "route", "status").
pub const REQUESTS_TOTAL: &str = "diagnohero_requests_total";
/// HTTP request duration histogram (seconds).
pub const REQUEST_DURATION_SECONDS: &str = "diagnohero_request_duration_seconds";
/// Total number of errors by type.
pub const ERRORS_TOTAL: &str = "diagnohero_errors_total";

// ============================================================================
// Metric Recording Functions
// ============================================================================

/// Record a heart spent.
#[inline]
pub fn record_heart_spent() {
    counter!(HEARTS_SPENT_TOTAL).increment(1);
}

/// Record hearts regenerated during settlement.
#[inline]
pub fn record_hearts_regenerated(count: u64) {
    counter!(HEARTS_REGENERATED_TOTAL).increment(count);
}

/// Record a spend attempt with no hearts left.
#[inline]
pub fn record_hearts_exhausted() {
    counter!(HEARTS_EXHAUSTED_TOTAL).increment(1);
}

/// Record a lost conditional update.
#[inline]
pub fn record_store_conflict() {
    counter!(STORE_CONFLICTS_TOTAL).increment(1);
}

/// Record a quiz answer.
#[inline]
pub fn record_answer(correct: bool) {
    let label = if correct { "true" } else { "false" };
    counter!(ANSWERS_TOTAL, "correct" => label).increment(1);
}

/// Record a premium upgrade.
#[inline]
pub fn record_premium_upgrade() {
    counter!(PREMIUM_UPGRADES_TOTAL).increment(1);
}

/// Record a handled HTTP request.
#[inline]
pub fn record_request(route: impl Into<String>, status: u16, duration_secs: f64) {
    let route = route.into();
    counter!(REQUESTS_TOTAL, "route" => route.clone(), "status" => status.to_string()).increment(1);
    histogram!(REQUEST_DURATION_SECONDS, "route" => route).record(duration_secs);
}

/// Record an error by type.
#[inline]
pub fn record_error(error_type: &'static str) {
    counter!(ERRORS_TOTAL, "type" => error_type).increment(1);
}

// ============================================================================
// Error Type Constants (re-exported from diagnohero-core)
// ============================================================================

pub use diagnohero_core::{
    ERROR_CONFIG, ERROR_CONFLICT, ERROR_IO, ERROR_NOT_FOUND, ERROR_STORE, ERROR_UNAUTHORIZED,
    ERROR_VALIDATION,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_listen_address() {
        let err = init_prometheus("not-an-address").unwrap_err();
        assert!(err.contains("invalid metrics listen address"));
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_heart_spent();
        record_hearts_regenerated(3);
        record_answer(false);
        record_request("/api/hearts", 200, 0.01);
        record_error(ERROR_STORE);
    }
}
