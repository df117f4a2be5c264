pub mod credentials;

use credentials::MongoCredentials;
use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

pub use credentials::CredentialSource;

#[derive(Debug, Clone)]
pub struct VoiceConfig {
    pub common: core_config::Config,
    pub environment: Environment,
    pub store: StoreConfig,
    pub mongodb: MongoConfig,
    pub auth: AuthConfig,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    /// Only resolved for the `mongo` backend.
    pub credentials: Option<MongoCredentials>,
    pub credential_source: Option<CredentialSource>,
    pub database: String,
    pub health_check_collection: String,
    pub voice_sample_collection: String,
}

#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub admin_secret: Option<Secret<String>>,
    pub user_secret: Option<Secret<String>>,
}

impl VoiceConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env, APP__ prefix and PORT)
        let common = core_config::Config::load()?;

        let environment: Environment = env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "dev".to_string())
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;
        let is_prod = environment == Environment::Prod;

        let backend: StoreBackend = get_env("STORE_BACKEND", Some("mongo"), false)?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        if is_prod && backend == StoreBackend::Memory {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "STORE_BACKEND=memory is not allowed in production"
            )));
        }

        let (credential_source, credentials) = match backend {
            StoreBackend::Mongo => {
                let (source, credentials) = credentials::resolve()?;
                (Some(source), Some(credentials))
            }
            StoreBackend::Memory => (None, None),
        };

        Ok(VoiceConfig {
            common,
            environment,
            store: StoreConfig { backend },
            mongodb: MongoConfig {
                credentials,
                credential_source,
                database: get_env("MONGODB_DATABASE", Some("voice-app"), false)?,
                health_check_collection: get_env(
                    "MONGODB_HEALTH_CHECK_COLLECTION",
                    Some("health-checks"),
                    false,
                )?,
                voice_sample_collection: get_env(
                    "MONGODB_VOICE_SAMPLE_COLLECTION",
                    Some("voice-samples"),
                    false,
                )?,
            },
            auth: AuthConfig {
                admin_secret: get_secret("NODE_API_SECRET_ADMIN", is_prod)?,
                user_secret: get_secret("NODE_API_SECRET_USER", is_prod)?,
            },
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
        })
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "development" | "local" => Ok(Environment::Dev),
            "prod" | "production" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

/// Secrets are mandatory in production. In dev a missing secret only disables
/// the routes that need it.
fn get_secret(key: &str, is_prod: bool) -> Result<Option<Secret<String>>, AppError> {
    match env::var(key) {
        Ok(val) if !val.is_empty() => Ok(Some(Secret::new(val))),
        _ if is_prod => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} is required in production but not set",
            key
        ))),
        _ => Ok(None),
    }
}
