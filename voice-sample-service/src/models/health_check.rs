use mongodb::bson::Document;
use serde::{Deserialize, Serialize};

/// Liveness probe record. The API never writes these and their fields are not
/// fixed, so the raw document is kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct HealthCheck(pub Document);
