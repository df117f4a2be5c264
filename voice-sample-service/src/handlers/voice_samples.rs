use super::RESULT_LIMIT;
use crate::dtos::{
    DeleteVoiceSampleResponse, ListResponse, SaveVoiceSampleRequest, SaveVoiceSampleResponse,
    VoiceSampleResponse,
};
use crate::middleware::{AdminAccess, ClientIp, UserAccess};
use crate::models::VoiceSample;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::WithRejection;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;

const UNKNOWN_IP: &str = "unknown";

pub async fn list_voice_samples(
    _admin: AdminAccess,
    State(state): State<AppState>,
) -> Result<Json<ListResponse<VoiceSampleResponse>>, AppError> {
    tracing::info!("Fetching voice samples");

    let samples = state
        .store
        .find_voice_samples(RESULT_LIMIT)
        .await
        .map_err(|e| {
            tracing::error!("Failed to query voice samples: {}", e);
            e
        })?;

    Ok(Json(ListResponse::ok(
        samples.into_iter().map(VoiceSampleResponse::from).collect(),
    )))
}

pub async fn save_voice_sample(
    UserAccess(access): UserAccess,
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    WithRejection(Json(request), _): WithRejection<Json<SaveVoiceSampleRequest>, AppError>,
) -> Result<Json<SaveVoiceSampleResponse>, AppError> {
    let ip = client_ip
        .or(request.ip)
        .unwrap_or_else(|| UNKNOWN_IP.to_string());
    let channels = request.audio.len();

    let id = state
        .store
        .insert_voice_sample(VoiceSample::new(ip.clone(), request.audio))
        .await
        .map_err(|e| {
            tracing::error!(ip = %ip, "Failed to save voice sample: {}", e);
            e
        })?;

    metrics::counter!("voice_samples_saved_total").increment(1);
    tracing::info!(
        id = %id,
        ip = %ip,
        channels,
        access = ?access,
        "Voice sample saved"
    );

    Ok(Json(SaveVoiceSampleResponse {
        status: true,
        id: id.to_hex(),
    }))
}

/// Succeeds whether or not a document with `id` existed.
pub async fn delete_voice_sample(
    UserAccess(access): UserAccess,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteVoiceSampleResponse>, AppError> {
    let object_id = ObjectId::parse_str(&id).map_err(|e| {
        AppError::BadRequest(anyhow::anyhow!("Invalid voice sample id '{}': {}", id, e))
    })?;

    let deleted = state
        .store
        .delete_voice_sample(object_id)
        .await
        .map_err(|e| {
            tracing::error!(id = %id, "Failed to delete voice sample: {}", e);
            e
        })?;

    metrics::counter!("voice_samples_deleted_total").increment(deleted);

    let message = format!("Document {} deleted successfully.", id);
    tracing::info!(id = %id, deleted, access = ?access, "{}", message);

    Ok(Json(DeleteVoiceSampleResponse {
        success: true,
        message,
    }))
}
