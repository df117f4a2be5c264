pub mod health_checks;
pub mod voice_samples;

pub use health_checks::HealthCheckResponse;
pub use voice_samples::{
    DeleteVoiceSampleResponse, ListResponse, SaveVoiceSampleRequest, SaveVoiceSampleResponse,
    VoiceSampleResponse, WelcomeResponse,
};
