use anyhow::Result;
use clap::Parser;
use huddle_relay::{RelayConfig, RelayState, router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "huddle_relay=debug,info".into()),
        )
        .init();

    let config = RelayConfig::parse();
    let state = RelayState::new(config.default_limit);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("relay listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
