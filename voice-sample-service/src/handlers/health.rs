use super::RESULT_LIMIT;
use crate::dtos::{HealthCheckResponse, ListResponse};
use crate::middleware::AdminAccess;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

/// `GET /health`: process liveness plus a store ping, for probes.
pub async fn service_health(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "voice-sample-service",
                "version": env!("CARGO_PKG_VERSION")
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "service": "voice-sample-service",
                "error": e.to_string()
            })),
        ),
    }
}

/// `GET /health-check`: stored health-check records, admin only.
pub async fn list_health_checks(
    _admin: AdminAccess,
    State(state): State<AppState>,
) -> Result<Json<ListResponse<HealthCheckResponse>>, AppError> {
    tracing::info!("Get health check");

    let records = state
        .store
        .find_health_checks(RESULT_LIMIT)
        .await
        .map_err(|e| {
            tracing::error!("Failed to query health checks: {}", e);
            e
        })?;

    tracing::debug!(count = records.len(), "Health check query succeeded");

    Ok(Json(ListResponse::ok(
        records.into_iter().map(HealthCheckResponse::from).collect(),
    )))
}
