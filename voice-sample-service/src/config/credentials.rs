//! MongoDB credential resolution.
//!
//! Sources are tried in [`PRECEDENCE`] order and the first one that yields a
//! complete set wins. A source that is absent is skipped; a source that is
//! present but unreadable is an error.

use mongodb::options::{ClientOptions, Credential};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use service_core::error::AppError;
use std::path::{Path, PathBuf};

pub const DEFAULT_CREDENTIALS_FILE: &str = "config/mongo.credentials.json";

const DEFAULT_SCHEME: &str = "mongodb+srv://";
const DEFAULT_QUERY: &str = "retryWrites=true&w=majority";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// `MONGODB_URI`, a complete connection string.
    ConnectionString,
    /// `MONGODB_URL`, `MONGODB_USER` and `MONGODB_PWD`, all set.
    Environment,
    /// JSON file with `url` (or `uri`), `mongoUser` and `mongoPassword`.
    File,
}

pub const PRECEDENCE: [CredentialSource; 3] = [
    CredentialSource::ConnectionString,
    CredentialSource::Environment,
    CredentialSource::File,
];

#[derive(Debug, Clone)]
pub enum MongoCredentials {
    ConnectionString(Secret<String>),
    UserPassword {
        host: String,
        user: String,
        password: Secret<String>,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsFile {
    #[serde(alias = "uri")]
    url: String,
    mongo_user: String,
    mongo_password: String,
}

/// Resolves credentials from the process environment and the file named by
/// `MONGODB_CREDENTIALS_FILE` (default [`DEFAULT_CREDENTIALS_FILE`]).
pub fn resolve() -> Result<(CredentialSource, MongoCredentials), AppError> {
    let file = std::env::var("MONGODB_CREDENTIALS_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CREDENTIALS_FILE));

    resolve_with(|key| std::env::var(key).ok(), &file)
}

pub fn resolve_with<F>(
    lookup: F,
    file: &Path,
) -> Result<(CredentialSource, MongoCredentials), AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    for source in PRECEDENCE {
        let credentials = match source {
            CredentialSource::ConnectionString => var("MONGODB_URI")
                .map(|uri| MongoCredentials::ConnectionString(Secret::new(uri))),
            CredentialSource::Environment => {
                match (var("MONGODB_URL"), var("MONGODB_USER"), var("MONGODB_PWD")) {
                    (Some(host), Some(user), Some(password)) => {
                        Some(MongoCredentials::UserPassword {
                            host,
                            user,
                            password: Secret::new(password),
                        })
                    }
                    _ => None,
                }
            }
            CredentialSource::File => read_file(file)?,
        };

        if let Some(credentials) = credentials {
            return Ok((source, credentials));
        }
    }

    Err(AppError::ConfigError(anyhow::anyhow!(
        "No MongoDB credentials found: set MONGODB_URI, or MONGODB_URL/MONGODB_USER/MONGODB_PWD, or provide {}",
        file.display()
    )))
}

fn read_file(path: &Path) -> Result<Option<MongoCredentials>, AppError> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = std::fs::read_to_string(path)?;
    let parsed: CredentialsFile = serde_json::from_str(&raw).map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!(
            "Invalid credentials file {}: {}",
            path.display(),
            e
        ))
    })?;

    Ok(Some(MongoCredentials::UserPassword {
        host: parsed.url,
        user: parsed.mongo_user,
        password: Secret::new(parsed.mongo_password),
    }))
}

impl MongoCredentials {
    /// Builds driver options without splicing the user or password into the
    /// URI; they travel as a structured [`Credential`].
    pub async fn client_options(&self) -> Result<ClientOptions, AppError> {
        let options = match self {
            MongoCredentials::ConnectionString(uri) => {
                ClientOptions::parse(uri.expose_secret()).await?
            }
            MongoCredentials::UserPassword {
                host,
                user,
                password,
            } => {
                let mut options = ClientOptions::parse(host_uri(host)).await?;
                options.credential = Some(
                    Credential::builder()
                        .username(user.clone())
                        .password(password.expose_secret().clone())
                        .build(),
                );
                options
            }
        };

        Ok(options)
    }

    /// Host part for logging; never includes a password.
    pub fn redacted_host(&self) -> String {
        match self {
            MongoCredentials::ConnectionString(uri) => {
                let uri = uri.expose_secret();
                match (uri.find("://"), uri.rfind('@')) {
                    (Some(scheme_end), Some(at)) if at > scheme_end => {
                        format!("{}***@{}", &uri[..scheme_end + 3], &uri[at + 1..])
                    }
                    _ => uri.clone(),
                }
            }
            MongoCredentials::UserPassword { host, .. } => host.clone(),
        }
    }
}

fn host_uri(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("mongodb://") || host.starts_with("mongodb+srv://") {
        host.to_string()
    } else {
        format!("{}{}/?{}", DEFAULT_SCHEME, host, DEFAULT_QUERY)
    }
}
