use crate::models::HealthCheck;
use mongodb::bson::Bson;
use serde::Serialize;
use serde_json::{Map, Value};

/// `_id` becomes a hex `id`; every other field is rendered as relaxed
/// extended JSON.
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl From<HealthCheck> for HealthCheckResponse {
    fn from(HealthCheck(mut document): HealthCheck) -> Self {
        let id = document.remove("_id").map(|id| match id {
            Bson::ObjectId(oid) => oid.to_hex(),
            Bson::String(s) => s,
            other => other.into_relaxed_extjson().to_string(),
        });

        let fields = document
            .into_iter()
            .map(|(key, value)| (key, value.into_relaxed_extjson()))
            .collect();

        Self { id, fields }
    }
}
