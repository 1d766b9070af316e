use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::claims::AuthContext;
use crate::error::AuthError;

/// Hands handlers the context attached by [`AuthLayer`](crate::AuthLayer).
///
/// A route that is not behind the layer has no context; the extractor then
/// rejects with 401 rather than letting the handler run unauthenticated.
#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AuthError::MissingCredential)
    }
}
