//! Tower middleware that puts an [`Authenticator`] in front of any service.
//!
//! Requests that fail authentication are answered here with 401/403 and never
//! reach the inner service. Accepted requests carry their [`AuthContext`] in the
//! request extensions, where handlers read it through the
//! [`AuthContext`] extractor.

use std::sync::Arc;
use std::task::{Context, Poll};

use axum::http::Request;
use axum::response::{IntoResponse, Response};
use futures_util::future::{ready, BoxFuture};
use futures_util::FutureExt;
use tower::{Layer, Service};
use tracing::debug;

use crate::authenticator::Authenticator;
use crate::claims::AuthContext;
use crate::config::AuthConfig;
use crate::error::AuthResult;
use crate::options::AuthOptions;

/// Build an authenticator from `config` and `options` and return its layer.
///
/// ```ignore
/// let protected = Router::new()
///     .route("/protected", get(protected_info))
///     .layer(auth_gate::handle(AuthConfig::new(secret), AuthOptions::new())?);
/// ```
pub fn handle(config: AuthConfig, options: AuthOptions) -> AuthResult<AuthLayer> {
    Authenticator::new(config, options).map(AuthLayer::new)
}

#[derive(Debug, Clone)]
pub struct AuthLayer {
    authenticator: Arc<Authenticator>,
}

impl AuthLayer {
    pub fn new(authenticator: Authenticator) -> Self {
        Self {
            authenticator: Arc::new(authenticator),
        }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            authenticator: self.authenticator.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthService<S> {
    inner: S,
    authenticator: Arc<Authenticator>,
}

impl<S, B> Service<Request<B>> for AuthService<S>
where
    S: Service<Request<B>, Response = Response>,
    S::Error: Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<B>) -> Self::Future {
        let context = match self.authenticator.authenticate(request.headers()) {
            Ok(context) => context,
            Err(err) => {
                debug!(
                    error = %err,
                    status = err.status().as_u16(),
                    method = %request.method(),
                    path = request.uri().path(),
                    "rejected request"
                );
                return ready(Ok(err.into_response())).boxed();
            }
        };

        request.extensions_mut().insert::<AuthContext>(context);
        self.inner.call(request).boxed()
    }
}
