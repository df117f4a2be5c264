#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use mongodb::bson::oid::ObjectId;
use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use service_core::error::AppError;
use std::sync::Arc;
use tower::ServiceExt;
use voice_sample_service::config::{
    AuthConfig, Environment, MongoConfig, StoreBackend, StoreConfig, VoiceConfig,
};
use voice_sample_service::middleware::{AccessSecrets, API_SECRET_HEADER};
use voice_sample_service::models::{HealthCheck, VoiceSample};
use voice_sample_service::services::VoiceStore;
use voice_sample_service::{build_router, AppState};

pub const ADMIN_SECRET: &str = "test-admin-secret";
pub const USER_SECRET: &str = "test-user-secret";

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        admin_secret: Some(Secret::new(ADMIN_SECRET.to_string())),
        user_secret: Some(Secret::new(USER_SECRET.to_string())),
    }
}

/// Memory-backed config on a random port.
pub fn test_config() -> VoiceConfig {
    VoiceConfig {
        common: CoreConfig {
            port: 0,
            log_level: "error".to_string(),
        },
        environment: Environment::Dev,
        store: StoreConfig {
            backend: StoreBackend::Memory,
        },
        mongodb: MongoConfig {
            credentials: None,
            credential_source: None,
            database: "voice-app-test".to_string(),
            health_check_collection: "health-checks".to_string(),
            voice_sample_collection: "voice-samples".to_string(),
        },
        auth: auth_config(),
        otlp_endpoint: None,
    }
}

pub fn test_router(store: Arc<dyn VoiceStore>) -> Router {
    build_router(AppState::new(
        store,
        AccessSecrets::from_config(&auth_config()),
    ))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("Response body is not JSON")
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Router failed to respond");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body")
        .to_vec();

    TestResponse { status, body }
}

pub fn get(uri: &str, secret: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(secret) = secret {
        builder = builder.header(API_SECRET_HEADER, secret);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn delete(uri: &str, secret: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("DELETE").uri(uri);
    if let Some(secret) = secret {
        builder = builder.header(API_SECRET_HEADER, secret);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, secret: Option<&str>, body: impl Into<Body>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(secret) = secret {
        builder = builder.header(API_SECRET_HEADER, secret);
    }
    builder.body(body.into()).unwrap()
}

/// Store whose every operation fails, for the error paths.
pub struct FailingStore;

fn offline() -> AppError {
    AppError::DatabaseError(anyhow::anyhow!("store offline"))
}

#[async_trait]
impl VoiceStore for FailingStore {
    async fn ping(&self) -> Result<(), AppError> {
        Err(offline())
    }

    async fn find_health_checks(&self, _limit: u32) -> Result<Vec<HealthCheck>, AppError> {
        Err(offline())
    }

    async fn find_voice_samples(&self, _limit: u32) -> Result<Vec<VoiceSample>, AppError> {
        Err(offline())
    }

    async fn insert_voice_sample(&self, _sample: VoiceSample) -> Result<ObjectId, AppError> {
        Err(offline())
    }

    async fn delete_voice_sample(&self, _id: ObjectId) -> Result<u64, AppError> {
        Err(offline())
    }
}
