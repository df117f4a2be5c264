use crate::models::{null_as_default, Audio, VoiceSample};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

/// Body of `POST /voice-sample/save`. Unknown fields are accepted and dropped.
#[derive(Debug, Default, Deserialize)]
pub struct SaveVoiceSampleRequest {
    /// Used only when the request itself carries no client address.
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub audio: Audio,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveVoiceSampleResponse {
    pub status: bool,
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteVoiceSampleResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub results: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn ok(results: Vec<T>) -> Self {
        Self {
            success: true,
            results,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct VoiceSampleResponse {
    pub id: String,
    pub ip: String,
    pub audio: Audio,
}

impl From<VoiceSample> for VoiceSampleResponse {
    fn from(sample: VoiceSample) -> Self {
        Self {
            id: sample.id.map(|id| id.to_hex()).unwrap_or_default(),
            ip: sample.ip,
            audio: sample.audio,
        }
    }
}
