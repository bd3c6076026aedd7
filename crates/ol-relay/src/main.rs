//! Relay binary entry point

use tracing::info;
use tracing_subscriber::EnvFilter;

use ol_relay::{router, AppState, RelayConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = RelayConfig::from_env()?;
    let addr = format!("0.0.0.0:{}", config.port);

    info!("Octolink relay starting on http://{}", addr);
    info!("OAuth callback URL: {}", config.backend_redirect_uri);
    info!("Client redirect target: {}", config.app_redirect_uri);

    let state = AppState::new(config)?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
