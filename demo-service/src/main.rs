use std::net::SocketAddr;

use anyhow::Context;
use demo_service::{build_router, DemoConfig};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = DemoConfig::from_env()?;
    let app = build_router(config.auth.clone()).context("Failed to build auth gate")?;

    let addr = SocketAddr::from((config.host, config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, token_lifetime = ?config.auth.token_lifetime, "starting demo-service");

    axum::serve(listener, app).await?;
    Ok(())
}
