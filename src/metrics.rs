/// Metrics and telemetry for the retail API
///
/// Provides Prometheus-compatible metrics for monitoring:
/// - HTTP request counts and latencies
/// - Login attempts by outcome
/// - Token verifications by outcome

use lazy_static::lazy_static;
use prometheus::{
    register_gauge, register_histogram_vec, register_int_counter_vec, Encoder, Gauge,
    HistogramVec, IntCounterVec, TextEncoder,
};

lazy_static! {
    /// Total HTTP requests by method, path, and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    /// HTTP request duration in seconds
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request latencies in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    /// Login attempts by outcome (success, unknown_account, bad_password, inactive, error)
    pub static ref AUTH_LOGIN_ATTEMPTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "auth_login_attempts_total",
        "Total number of login attempts",
        &["outcome"]
    )
    .unwrap();

    /// Bearer token verifications by outcome
    pub static ref AUTH_TOKEN_VERIFICATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "auth_token_verifications_total",
        "Total number of bearer token verifications",
        &["outcome"]
    )
    .unwrap();

    /// Application uptime in seconds
    pub static ref UPTIME_SECONDS: Gauge = register_gauge!(
        "uptime_seconds",
        "Application uptime in seconds"
    )
    .unwrap();
}

/// Render metrics in Prometheus text format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration);
}

/// Record a login attempt
pub fn record_login_attempt(outcome: &str) {
    AUTH_LOGIN_ATTEMPTS_TOTAL.with_label_values(&[outcome]).inc();
}

/// Record a token verification
pub fn record_token_verification(outcome: &str) {
    AUTH_TOKEN_VERIFICATIONS_TOTAL
        .with_label_values(&[outcome])
        .inc();
}

/// Update the uptime gauge
pub fn set_uptime(seconds: f64) {
    UPTIME_SECONDS.set(seconds);
}
