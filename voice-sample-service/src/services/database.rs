use super::store::VoiceStore;
use crate::config::{credentials::MongoCredentials, MongoConfig};
use crate::models::{HealthCheck, VoiceSample};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, Document},
    options::FindOptions,
    Client as MongoClient, Collection, Database,
};
use service_core::error::AppError;

const APP_NAME: &str = "voice-sample-service";

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
    health_check_collection: String,
    voice_sample_collection: String,
}

impl MongoDb {
    /// Builds the client and makes a single `ping`. There is no retry: a
    /// failure here is meant to stop the process.
    pub async fn connect(
        credentials: &MongoCredentials,
        config: &MongoConfig,
    ) -> Result<Self, AppError> {
        let host = credentials.redacted_host();
        tracing::info!(host = %host, "Connecting to MongoDB");

        let mut options = credentials.client_options().await.map_err(|e| {
            tracing::error!("Failed to parse MongoDB connection options for {}: {}", host, e);
            e
        })?;
        options.app_name = Some(APP_NAME.to_string());

        let client = MongoClient::with_options(options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client for {}: {}", host, e);
            AppError::from(e)
        })?;
        let db = client.database(&config.database);

        let mongo = Self {
            client,
            db,
            health_check_collection: config.health_check_collection.clone(),
            voice_sample_collection: config.voice_sample_collection.clone(),
        };
        mongo.ping().await?;

        tracing::info!(database = %config.database, "Successfully connected to the database");
        Ok(mongo)
    }

    pub fn health_checks(&self) -> Collection<HealthCheck> {
        self.db.collection(&self.health_check_collection)
    }

    pub fn voice_samples(&self) -> Collection<VoiceSample> {
        self.db.collection(&self.voice_sample_collection)
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

fn limited(limit: u32) -> FindOptions {
    FindOptions::builder().limit(i64::from(limit)).build()
}

/// Decodes each record on its own so one malformed document is skipped
/// instead of failing the whole listing.
fn decode_voice_samples(documents: Vec<Document>) -> Vec<VoiceSample> {
    documents
        .into_iter()
        .filter_map(|document| {
            let id = document.get_object_id("_id").ok();
            match bson::from_document::<VoiceSample>(document) {
                Ok(sample) => Some(sample),
                Err(e) => {
                    tracing::warn!(id = ?id, "Skipping unreadable voice sample: {}", e);
                    None
                }
            }
        })
        .collect()
}

#[async_trait]
impl VoiceStore for MongoDb {
    async fn ping(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB ping failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    async fn find_health_checks(&self, limit: u32) -> Result<Vec<HealthCheck>, AppError> {
        let cursor = self.health_checks().find(doc! {}, limited(limit)).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_voice_samples(&self, limit: u32) -> Result<Vec<VoiceSample>, AppError> {
        let cursor = self
            .db
            .collection::<Document>(&self.voice_sample_collection)
            .find(doc! {}, limited(limit))
            .await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(decode_voice_samples(documents))
    }

    async fn insert_voice_sample(&self, mut sample: VoiceSample) -> Result<ObjectId, AppError> {
        // Let the driver assign `_id`.
        sample.id = None;
        let result = self.voice_samples().insert_one(&sample, None).await?;

        result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::DatabaseError(anyhow::anyhow!(
                "Inserted voice sample has a non-ObjectId _id: {}",
                result.inserted_id
            ))
        })
    }

    async fn delete_voice_sample(&self, id: ObjectId) -> Result<u64, AppError> {
        let result = self
            .voice_samples()
            .delete_one(doc! { "_id": id }, None)
            .await?;
        Ok(result.deleted_count)
    }
}
