use std::fmt;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::Value;
use tracing::debug;

use crate::claims::{AuthContext, WireClaims};
use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::middleware::AuthLayer;
use crate::options::AuthOptions;

const BEARER_PREFIX: &str = "Bearer ";

/// Upper bound for the configured clock-skew leeway (one day).
const MAX_LEEWAY_SECONDS: u64 = 24 * 60 * 60;

/// The only algorithms a token may be verified with. Chosen here, never taken
/// from the token header.
const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Verifies bearer tokens against a shared HMAC secret and turns them into an
/// [`AuthContext`].
///
/// Holds no per-request state; share one instance (behind an `Arc`) across all
/// requests.
#[derive(Clone)]
pub struct Authenticator {
    config: AuthConfig,
    options: AuthOptions,
    key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("Authenticator")
            .field("config", &self.config)
            .field("options", &self.options)
            .field("validation", &self.validation)
            .finish()
    }
}

impl Authenticator {
    pub fn new(config: AuthConfig, options: AuthOptions) -> AuthResult<Self> {
        if config.secret.is_empty() {
            return Err(AuthError::EmptySecret);
        }
        if config.leeway_seconds > MAX_LEEWAY_SECONDS {
            return Err(AuthError::InvalidConfig(
                "AUTH_LEEWAY_SECONDS",
                format!(
                    "{} exceeds the maximum of {MAX_LEEWAY_SECONDS}",
                    config.leeway_seconds
                ),
            ));
        }

        let key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = HMAC_ALGORITHMS.to_vec();
        validation.set_required_spec_claims(&["exp"]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.leeway = config.leeway_seconds;

        Ok(Self {
            config,
            options,
            key,
            validation,
        })
    }

    /// Wrap downstream services with this authenticator.
    pub fn layer(self) -> AuthLayer {
        AuthLayer::new(self)
    }

    /// Returns the credential following an exact `Bearer ` prefix, or `None` when
    /// the header is absent, unreadable, uses another scheme, or carries only
    /// whitespace.
    pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
        let token = headers
            .get(AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix(BEARER_PREFIX)?
            .trim();

        if token.is_empty() {
            None
        } else {
            Some(token)
        }
    }

    /// Check signature, algorithm and temporal claims, returning the decoded claims.
    pub fn verify(&self, token: &str) -> AuthResult<WireClaims> {
        let token_data = decode::<Value>(token, &self.key, &self.validation)?;
        let claims = WireClaims::try_from(token_data.claims)?;

        self.check_temporal(&claims, Utc::now().timestamp())?;

        debug!(subject = %claims.subject, alg = ?token_data.header.alg, "verified bearer token");
        Ok(claims)
    }

    /// `exp` must lie strictly after `now` and `iat` must not lie after it, both
    /// widened by the leeway.
    fn check_temporal(&self, claims: &WireClaims, now: i64) -> AuthResult<()> {
        // Bounded by MAX_LEEWAY_SECONDS in `new`.
        let leeway = self.config.leeway_seconds as i64;
        if claims.expires_at <= now.saturating_sub(leeway) {
            return Err(AuthError::ExpiredOrMissingTemporalClaims(
                "token has expired".to_string(),
            ));
        }
        if claims.issued_at > now.saturating_add(leeway) {
            return Err(AuthError::ExpiredOrMissingTemporalClaims(
                "'iat' is in the future".to_string(),
            ));
        }
        Ok(())
    }

    /// Derive the context and apply the admin gate.
    pub fn authorize(&self, claims: WireClaims) -> AuthResult<AuthContext> {
        let context = AuthContext::from(claims);
        if self.options.require_admin && !context.is_admin() {
            return Err(AuthError::InsufficientPrivilege);
        }
        Ok(context)
    }

    /// Run the full gate for one request: extract, verify, derive, authorize.
    /// The first failure ends the evaluation.
    pub fn authenticate(&self, headers: &HeaderMap) -> AuthResult<AuthContext> {
        let token = Self::extract_bearer(headers).ok_or(AuthError::MissingCredential)?;
        let claims = self.verify(token)?;
        self.authorize(claims)
    }
}
