//! Prometheus metrics for tournament lifecycle and oracle activity.
//!
//! Metrics are exposed in Prometheus text format at `http://<METRICS_BIND>/metrics`
//! when a metrics address is configured. Without an installed recorder the
//! helpers below are no-ops.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use tournament_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::oracle_submission("accepted");
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Sets up a Prometheus scrape endpoint on the specified address.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// Tournament Metrics
// ============================================================================

/// Record a tournament entering `state`
pub fn tournament_transition(state: &str) {
    metrics::counter!("tournament_transitions_total", "state" => state.to_string()).increment(1);
}

/// Record a participant joining a roster
pub fn participant_registered() {
    metrics::counter!("tournament_registrations_total").increment(1);
}

// ============================================================================
// Oracle Metrics
// ============================================================================

/// Record a result submission by outcome (`accepted`, `unauthorized`, `already_finalized`)
pub fn oracle_submission(outcome: &str) {
    metrics::counter!("oracle_submissions_total", "outcome" => outcome.to_string()).increment(1);
}

/// Set the number of authorized reporters
pub fn oracle_reporters(count: usize) {
    metrics::gauge!("oracle_reporters").set(count as f64);
}

// ============================================================================
// API Metrics
// ============================================================================

/// Record an API error response by error kind
pub fn api_error(kind: &str) {
    metrics::counter!("api_errors_total", "kind" => kind.to_string()).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers_without_recorder() {
        tournament_transition("in_progress");
        participant_registered();
        oracle_submission("accepted");
        oracle_reporters(3);
        api_error("not_found");
    }
}
