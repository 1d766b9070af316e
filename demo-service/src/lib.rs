use std::env;
use std::net::IpAddr;

use anyhow::{Context, Result};
use auth_gate::{AuthConfig, AuthContext, AuthOptions, AuthResult, Authenticator};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub auth: AuthConfig,
    pub host: IpAddr,
    pub port: u16,
}

impl DemoConfig {
    pub fn from_env() -> Result<Self> {
        let auth = AuthConfig::from_env().context("Failed to load auth configuration")?;

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let host: IpAddr = host
            .parse()
            .with_context(|| format!("Invalid HOST '{host}'"))?;

        let port = match env::var("PORT") {
            Ok(value) => value
                .trim()
                .parse::<u16>()
                .with_context(|| format!("Invalid PORT '{value}'"))?,
            Err(_) => 3000,
        };

        Ok(Self { auth, host, port })
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn protected_info() -> &'static str {
    "Protected Info!"
}

async fn me(context: AuthContext) -> Json<AuthContext> {
    Json(context)
}

async fn admin_info(context: AuthContext) -> String {
    format!("Admin Info for {}", context.user_id())
}

/// `/healthz` is open; `/protected` and `/me` need a valid bearer token;
/// `/admin` additionally needs an admin caller.
pub fn build_router(config: AuthConfig) -> AuthResult<Router> {
    let authenticated = Authenticator::new(config.clone(), AuthOptions::new())?.layer();
    let admin_only = Authenticator::new(config, AuthOptions::new().only_admin())?.layer();

    let protected = Router::new()
        .route("/protected", get(protected_info))
        .route("/me", get(me))
        .layer(authenticated);

    let admin = Router::new()
        .route("/admin", get(admin_info))
        .layer(admin_only);

    Ok(Router::new()
        .route("/healthz", get(health))
        .merge(protected)
        .merge(admin)
        .layer(TraceLayer::new_for_http()))
}
