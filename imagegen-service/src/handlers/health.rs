use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Health check endpoint for liveness probes.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "imagegen-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness check endpoint. Ready once the inference provider is configured.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.inference.health_check().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Inference provider not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
