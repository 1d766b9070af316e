use axum::http::{header::WWW_AUTHENTICATE, StatusCode};
use axum::response::{IntoResponse, Response};
use jsonwebtoken::errors::ErrorKind;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("bearer credential missing")]
    MissingCredential,
    #[error("malformed credential: {0}")]
    MalformedCredential(String),
    #[error("unexpected signing algorithm: {0}")]
    AlgorithmMismatch(String),
    #[error("token signature invalid")]
    SignatureInvalid,
    #[error("token temporal claims rejected: {0}")]
    ExpiredOrMissingTemporalClaims(String),
    #[error("admin privilege required")]
    InsufficientPrivilege,
    #[error("auth secret must not be empty")]
    EmptySecret,
    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),
    #[error("invalid configuration value for {0}: {1}")]
    InvalidConfig(&'static str, String),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingCredential
            | AuthError::MalformedCredential(_)
            | AuthError::AlgorithmMismatch(_)
            | AuthError::SignatureInvalid
            | AuthError::ExpiredOrMissingTemporalClaims(_) => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPrivilege => StatusCode::FORBIDDEN,
            AuthError::EmptySecret | AuthError::MissingConfig(_) | AuthError::InvalidConfig(_, _) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Body sent to the client. Credential failures share one message so the
    /// response does not reveal which check failed.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::InsufficientPrivilege => "forbidden request",
            AuthError::EmptySecret | AuthError::MissingConfig(_) | AuthError::InvalidConfig(_, _) => {
                "internal server error"
            }
            _ => "unauthorized request",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(value: jsonwebtoken::errors::Error) -> Self {
        match value.kind() {
            ErrorKind::InvalidSignature => AuthError::SignatureInvalid,
            ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingAlgorithm => AuthError::AlgorithmMismatch(value.to_string()),
            ErrorKind::ExpiredSignature
            | ErrorKind::ImmatureSignature
            | ErrorKind::MissingRequiredClaim(_) => {
                AuthError::ExpiredOrMissingTemporalClaims(value.to_string())
            }
            _ => AuthError::MalformedCredential(value.to_string()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = self.public_message();
        if status == StatusCode::UNAUTHORIZED {
            (status, [(WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}
