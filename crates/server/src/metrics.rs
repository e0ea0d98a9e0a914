//! Prometheus metrics for observability.
//!
//! This module provides the HTTP and Telegram transport metrics and
//! registers the core metrics (searches, registrations, uploads, commands)
//! alongside them.

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use tracing::warn;

use magpie_core::metrics::REGISTRY_USERS;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "magpie_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("magpie_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "magpie_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

/// API key failures on the message endpoint.
pub static AUTH_FAILURES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("magpie_auth_failures_total", "Total API key failures"),
        &["reason"],
    )
    .unwrap()
});

// =============================================================================
// Telegram Metrics
// =============================================================================

/// Telegram Bot API calls by method and result.
pub static TELEGRAM_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "magpie_telegram_requests_total",
            "Telegram Bot API calls",
        ),
        &["method", "result"],
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();
    registry
        .register(Box::new(AUTH_FAILURES_TOTAL.clone()))
        .unwrap();

    // Telegram
    registry
        .register(Box::new(TELEGRAM_REQUESTS_TOTAL.clone()))
        .unwrap();

    // Core metrics (searches, registry, uploads, commands)
    for metric in magpie_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        warn!(error = %e, "Failed to encode metrics");
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Refresh gauges that mirror application state before encoding.
pub async fn collect_dynamic_metrics(state: &crate::state::AppState) {
    let users = state.dispatcher().registry().user_count().await;
    REGISTRY_USERS.set(users as i64);
}

/// Routes served by the API, used as metric labels.
const KNOWN_PATHS: [&str; 4] = [
    "/api/v1/health",
    "/api/v1/config",
    "/api/v1/messages",
    "/metrics",
];

/// Map a request path to a bounded metric label.
pub fn normalize_path(path: &str) -> &'static str {
    let trimmed = match path.trim_end_matches('/') {
        "" => "/",
        p => p,
    };
    KNOWN_PATHS
        .iter()
        .find(|known| **known == trimmed)
        .copied()
        .unwrap_or("other")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_known_paths() {
        assert_eq!(normalize_path("/api/v1/health"), "/api/v1/health");
        assert_eq!(normalize_path("/api/v1/messages/"), "/api/v1/messages");
        assert_eq!(normalize_path("/metrics"), "/metrics");
    }

    #[test]
    fn test_normalize_unknown_paths() {
        assert_eq!(normalize_path("/wp-login.php"), "other");
        assert_eq!(normalize_path("/"), "other");
        assert_eq!(normalize_path("/api/v1/tickets/12345"), "other");
    }

    #[test]
    fn test_encode_metrics_returns_prometheus_format() {
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/api/v1/health", "200"])
            .inc();

        let output = encode_metrics();
        assert!(output.contains("magpie_http_requests_total"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }

    #[test]
    fn test_registry_contains_core_metrics() {
        magpie_core::metrics::COMMANDS_TOTAL
            .with_label_values(&["search", "handled"])
            .inc();
        REGISTRY_USERS.set(0);
        TELEGRAM_REQUESTS_TOTAL
            .with_label_values(&["getUpdates", "ok"])
            .inc();

        let output = encode_metrics();

        assert!(output.contains("magpie_commands_total"));
        assert!(output.contains("magpie_registry_users"));
        assert!(output.contains("magpie_telegram_requests_total"));
    }
}
