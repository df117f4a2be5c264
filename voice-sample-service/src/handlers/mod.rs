pub mod health;
pub mod metrics;
pub mod root;
pub mod voice_samples;

pub use health::{list_health_checks, service_health};
pub use self::metrics::metrics;
pub use root::welcome;
pub use voice_samples::{delete_voice_sample, list_voice_samples, save_voice_sample};

/// Upper bound on records returned by the list routes.
pub const RESULT_LIMIT: u32 = 10;
