use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize};

/// Audio frames as captured by the client. Samples that were `NaN` on the
/// client arrive as `null` and are kept as `None`.
pub type Audio = Vec<Vec<Option<f64>>>;

/// A stored voice sample.
///
/// `id` is `None` until the store assigns one on insert. Older documents in the
/// collection may predate the `ip`/`audio` shape, so both default when absent
/// or `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoiceSample {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ip: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub audio: Audio,
}

impl VoiceSample {
    pub fn new(ip: String, audio: Audio) -> Self {
        Self {
            id: None,
            ip,
            audio,
        }
    }
}

pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
