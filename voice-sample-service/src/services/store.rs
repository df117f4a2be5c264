use crate::models::{HealthCheck, VoiceSample};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;

/// Gateway to the two collections the API serves.
///
/// `limit` caps the number of returned records and must be non-zero.
#[async_trait]
pub trait VoiceStore: Send + Sync {
    async fn ping(&self) -> Result<(), AppError>;

    async fn find_health_checks(&self, limit: u32) -> Result<Vec<HealthCheck>, AppError>;

    async fn find_voice_samples(&self, limit: u32) -> Result<Vec<VoiceSample>, AppError>;

    /// Inserts `sample` (its `id` is ignored) and returns the assigned id.
    async fn insert_voice_sample(&self, sample: VoiceSample) -> Result<ObjectId, AppError>;

    /// Returns the number of removed documents, `0` when nothing matched.
    async fn delete_voice_sample(&self, id: ObjectId) -> Result<u64, AppError>;
}
