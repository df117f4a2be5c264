use super::store::VoiceStore;
use crate::models::{HealthCheck, VoiceSample};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;
use std::sync::{Mutex, MutexGuard};

/// Process-local store for `STORE_BACKEND=memory` and tests. Records come back
/// in insertion order.
#[derive(Default)]
pub struct InMemoryStore {
    health_checks: Mutex<Vec<HealthCheck>>,
    voice_samples: Mutex<Vec<VoiceSample>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_health_checks(health_checks: Vec<HealthCheck>) -> Self {
        Self {
            health_checks: Mutex::new(health_checks),
            voice_samples: Mutex::new(Vec::new()),
        }
    }

    pub fn voice_sample_count(&self) -> Result<usize, AppError> {
        Ok(lock(&self.voice_samples)?.len())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, AppError> {
    mutex
        .lock()
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("In-memory store mutex poisoned: {}", e)))
}

#[async_trait]
impl VoiceStore for InMemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn find_health_checks(&self, limit: u32) -> Result<Vec<HealthCheck>, AppError> {
        Ok(lock(&self.health_checks)?
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn find_voice_samples(&self, limit: u32) -> Result<Vec<VoiceSample>, AppError> {
        Ok(lock(&self.voice_samples)?
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn insert_voice_sample(&self, mut sample: VoiceSample) -> Result<ObjectId, AppError> {
        let id = ObjectId::new();
        sample.id = Some(id);
        lock(&self.voice_samples)?.push(sample);
        Ok(id)
    }

    async fn delete_voice_sample(&self, id: ObjectId) -> Result<u64, AppError> {
        let mut samples = lock(&self.voice_samples)?;
        let before = samples.len();
        samples.retain(|sample| sample.id != Some(id));
        Ok((before - samples.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn assigns_fresh_ids() {
        let store = InMemoryStore::new();
        let mut sample = VoiceSample::new("::1".to_string(), vec![]);
        sample.id = Some(ObjectId::new());

        let first = store.insert_voice_sample(sample.clone()).await.unwrap();
        let second = store.insert_voice_sample(sample).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(store.voice_sample_count().unwrap(), 2);
    }

    #[tokio::test]
    async fn find_respects_limit() {
        let store = InMemoryStore::new();
        for _ in 0..12 {
            store
                .insert_voice_sample(VoiceSample::new("::1".to_string(), vec![]))
                .await
                .unwrap();
        }

        assert_eq!(store.find_voice_samples(10).await.unwrap().len(), 10);
    }

    #[tokio::test]
    async fn delete_reports_matches() {
        let store = InMemoryStore::new();
        let id = store
            .insert_voice_sample(VoiceSample::new("::1".to_string(), vec![vec![Some(0.5)]]))
            .await
            .unwrap();

        assert_eq!(store.delete_voice_sample(id).await.unwrap(), 1);
        assert_eq!(store.delete_voice_sample(id).await.unwrap(), 0);
        assert!(store.find_voice_samples(10).await.unwrap().is_empty());
    }
}
