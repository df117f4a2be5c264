//! Shared-secret authorization.
//!
//! Callers present a static secret in the `x-api-secret` header. The admin
//! secret grants every capability; the user secret grants the user ones.
//! Nothing here is a session or a token: there is no expiry and no identity.

use crate::config::AuthConfig;
use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use secrecy::{ExposeSecret, Secret};
use service_core::error::AppError;
use subtle::ConstantTimeEq;

pub const API_SECRET_HEADER: &str = "x-api-secret";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Unauthorized,
    User,
    Admin,
}

impl Access {
    pub fn is_admin(self) -> bool {
        matches!(self, Access::Admin)
    }

    pub fn is_user(self) -> bool {
        matches!(self, Access::User | Access::Admin)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AccessSecrets {
    admin: Option<Secret<String>>,
    user: Option<Secret<String>>,
}

impl AccessSecrets {
    pub fn new(admin: Option<Secret<String>>, user: Option<Secret<String>>) -> Self {
        Self { admin, user }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.admin_secret.clone(), config.user_secret.clone())
    }

    pub fn has_admin(&self) -> bool {
        self.admin.is_some()
    }

    pub fn has_user(&self) -> bool {
        self.user.is_some()
    }

    pub fn classify(&self, presented: Option<&str>) -> Access {
        let Some(presented) = presented else {
            return Access::Unauthorized;
        };

        if secret_matches(self.admin.as_ref(), presented) {
            Access::Admin
        } else if secret_matches(self.user.as_ref(), presented) {
            Access::User
        } else {
            Access::Unauthorized
        }
    }
}

fn secret_matches(expected: Option<&Secret<String>>, presented: &str) -> bool {
    let Some(expected) = expected else {
        return false;
    };
    let expected = expected.expose_secret().as_bytes();
    let presented = presented.as_bytes();

    if expected.is_empty() || expected.len() != presented.len() {
        return false;
    }

    expected.ct_eq(presented).into()
}

fn caller_access<S>(parts: &Parts, state: &S) -> Access
where
    AccessSecrets: FromRef<S>,
{
    let presented = parts
        .headers
        .get(API_SECRET_HEADER)
        .and_then(|v| v.to_str().ok());

    AccessSecrets::from_ref(state).classify(presented)
}

/// Admits only the admin secret; anything else is a bare 403.
#[derive(Debug, Clone, Copy)]
pub struct AdminAccess;

#[async_trait]
impl<S> FromRequestParts<S> for AdminAccess
where
    AccessSecrets: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if caller_access(parts, state).is_admin() {
            Ok(AdminAccess)
        } else {
            tracing::warn!(path = %parts.uri.path(), "Rejected caller without admin secret");
            Err(AppError::Forbidden)
        }
    }
}

/// Admits the user or the admin secret and carries which one matched.
#[derive(Debug, Clone, Copy)]
pub struct UserAccess(pub Access);

#[async_trait]
impl<S> FromRequestParts<S> for UserAccess
where
    AccessSecrets: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let access = caller_access(parts, state);
        if access.is_user() {
            Ok(UserAccess(access))
        } else {
            tracing::warn!(path = %parts.uri.path(), "Rejected caller without user secret");
            Err(AppError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secrets() -> AccessSecrets {
        AccessSecrets::new(
            Some(Secret::new("admin-secret".to_string())),
            Some(Secret::new("user-secret".to_string())),
        )
    }

    #[test]
    fn classifies_callers() {
        let secrets = secrets();
        assert_eq!(secrets.classify(Some("admin-secret")), Access::Admin);
        assert_eq!(secrets.classify(Some("user-secret")), Access::User);
        assert_eq!(secrets.classify(Some("user-secre")), Access::Unauthorized);
        assert_eq!(secrets.classify(Some("")), Access::Unauthorized);
        assert_eq!(secrets.classify(None), Access::Unauthorized);
    }

    #[test]
    fn admin_holds_user_capability() {
        assert!(Access::Admin.is_user());
        assert!(Access::User.is_user());
        assert!(!Access::User.is_admin());
        assert!(!Access::Unauthorized.is_user());
    }

    #[test]
    fn unset_secrets_never_match() {
        let secrets = AccessSecrets::new(None, Some(Secret::new(String::new())));
        assert_eq!(secrets.classify(Some("")), Access::Unauthorized);
        assert_eq!(secrets.classify(Some("anything")), Access::Unauthorized);
    }
}
