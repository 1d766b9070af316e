use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};
use crate::roles::ROLE_ADMIN;

/// Claims carried by a verified bearer token, under their wire names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WireClaims {
    #[serde(rename = "sub")]
    pub subject: String,
    pub email: String,
    pub roles: Vec<String>,
    pub admin: bool,
    #[serde(rename = "exp")]
    pub expires_at: i64,
    #[serde(rename = "iat")]
    pub issued_at: i64,
}

impl WireClaims {
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.expires_at, 0).single()
    }

    pub fn derive_context(&self) -> AuthContext {
        derive_context(self)
    }
}

#[derive(Debug, Deserialize)]
struct ClaimsRepr {
    #[serde(default)]
    sub: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    roles: Option<Vec<String>>,
    #[serde(default)]
    admin: Option<bool>,
    #[serde(default)]
    exp: Option<i64>,
    #[serde(default)]
    iat: Option<i64>,
}

impl TryFrom<ClaimsRepr> for WireClaims {
    type Error = AuthError;

    fn try_from(value: ClaimsRepr) -> AuthResult<Self> {
        let expires_at = value.exp.ok_or_else(|| {
            AuthError::ExpiredOrMissingTemporalClaims("missing 'exp' claim".to_string())
        })?;
        let issued_at = value.iat.ok_or_else(|| {
            AuthError::ExpiredOrMissingTemporalClaims("missing 'iat' claim".to_string())
        })?;

        Ok(Self {
            subject: value.sub,
            email: value.email,
            roles: value.roles.unwrap_or_default(),
            admin: value.admin.unwrap_or(false),
            expires_at,
            issued_at,
        })
    }
}

impl TryFrom<serde_json::Value> for WireClaims {
    type Error = AuthError;

    fn try_from(value: serde_json::Value) -> AuthResult<Self> {
        let repr: ClaimsRepr = serde_json::from_value(value)
            .map_err(|err| AuthError::MalformedCredential(err.to_string()))?;
        WireClaims::try_from(repr)
    }
}

/// Authenticated identity handed to downstream handlers.
///
/// Only ever built from verified [`WireClaims`]; fields are exposed read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthContext {
    is_admin: bool,
    user_id: String,
    email: String,
    roles: Vec<String>,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// Convenience helper for role checks (exact match).
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|value| value == role)
    }
}

/// Fold verified claims into the handler-facing context. Performs no verification.
pub fn derive_context(claims: &WireClaims) -> AuthContext {
    AuthContext::from(claims.clone())
}

impl From<WireClaims> for AuthContext {
    fn from(value: WireClaims) -> Self {
        Self {
            is_admin: value.admin || value.roles.iter().any(|role| role == ROLE_ADMIN),
            user_id: value.subject,
            email: value.email,
            roles: value.roles,
        }
    }
}
