/// Health check and metrics endpoints
///
/// Supports two kinds of checks:
/// - Liveness: Is the application alive? (restart if not)
/// - Readiness: Can the application serve traffic? (database reachable)

use crate::{context::AppContext, db, error::AppError, metrics};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};

/// Build health check routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health_basic))
        .route("/health/live", get(liveness_check))
        .route("/health/ready", get(readiness_check))
        .route("/metrics", get(metrics_endpoint))
}

async fn welcome() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Welcome to the retail API"
    }))
}

/// Basic health check
pub async fn health_basic() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Liveness check
///
/// If we can respond, we're alive.
pub async fn liveness_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness check
///
/// Returns 200 if the database answers, 503 otherwise.
pub async fn readiness_check(
    State(ctx): State<AppContext>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    if let Err(e) = db::test_connection(&ctx.db).await {
        tracing::warn!(error = %e, "readiness_check_failed: database check failed");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(serde_json::json!({
        "status": "ready",
        "version": env!("CARGO_PKG_VERSION")
    })))
}

/// Prometheus text exposition
pub async fn metrics_endpoint(State(ctx): State<AppContext>) -> Result<impl IntoResponse, AppError> {
    metrics::set_uptime(ctx.started_at.elapsed().as_secs_f64());

    let body = metrics::render_metrics()
        .map_err(|e| AppError::internal(format!("Failed to render metrics: {}", e)))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}
