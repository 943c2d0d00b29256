//! Structured logging configuration.
//!
//! Library crates log through the `log` facade; the subscriber installed here
//! picks those records up alongside the server's own `tracing` events.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use tournament_oracle::ids::Identity;

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var.
///
/// # Example
///
/// ```no_run
/// use tournament_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,tower_http=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log security event with structured data
///
/// # Arguments
///
/// * `event_type` - Type of security event
/// * `caller` - Authenticated caller, if any
/// * `path` - Request path
/// * `message` - Event message
///
/// # Example
///
/// ```
/// use tournament_server::logging::log_security_event;
///
/// log_security_event("invalid_token", None, "/api/v1/results", "InvalidSignature");
/// ```
pub fn log_security_event(
    event_type: &str,
    caller: Option<&Identity>,
    path: &str,
    message: &str,
) {
    tracing::warn!(
        event_type = event_type,
        caller = caller.map(Identity::as_str),
        path = path,
        "SECURITY: {}",
        message
    );
}
