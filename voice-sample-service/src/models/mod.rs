pub mod health_check;
pub mod voice_sample;

pub use health_check::HealthCheck;
pub use voice_sample::{null_as_default, Audio, VoiceSample};
