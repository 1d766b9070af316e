use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::{AuthError, AuthResult};

const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(60 * 60);

/// Runtime configuration for bearer token verification.
#[derive(Clone)]
pub struct AuthConfig {
    /// Shared HMAC secret used to verify token signatures.
    pub secret: String,
    /// Lifetime token issuers should stamp into `exp`. Never read by the verifier,
    /// which trusts the expiry embedded in each token.
    pub token_lifetime: Duration,
    /// Allowable clock skew in seconds when validating exp/nbf/iat.
    pub leeway_seconds: u64,
}

impl AuthConfig {
    /// Construct config with a one hour token lifetime and no leeway.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            token_lifetime: DEFAULT_TOKEN_LIFETIME,
            leeway_seconds: 0,
        }
    }

    pub fn with_token_lifetime(mut self, lifetime: Duration) -> Self {
        self.token_lifetime = lifetime;
        self
    }

    /// Adjust the allowed leeway.
    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    /// Load from `AUTH_SECRET`, `AUTH_TOKEN_EXP_SECONDS` and `AUTH_LEEWAY_SECONDS`.
    pub fn from_env() -> AuthResult<Self> {
        let secret = env::var("AUTH_SECRET").map_err(|_| AuthError::MissingConfig("AUTH_SECRET"))?;

        let mut config = Self::new(secret);
        if let Some(seconds) = u64_from_env("AUTH_TOKEN_EXP_SECONDS")? {
            config = config.with_token_lifetime(Duration::from_secs(seconds));
        }
        if let Some(seconds) = u64_from_env("AUTH_LEEWAY_SECONDS")? {
            config = config.with_leeway(seconds);
        }
        Ok(config)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("token_lifetime", &self.token_lifetime)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

fn u64_from_env(key: &'static str) -> AuthResult<Option<u64>> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|err| AuthError::InvalidConfig(key, format!("'{value}': {err}"))),
        Err(_) => Ok(None),
    }
}
