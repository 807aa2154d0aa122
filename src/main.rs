use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use proclubs_dashboard::config::Config;
use proclubs_dashboard::official_fetch::platform_label;
use proclubs_dashboard::routes::build_router;
use proclubs_dashboard::{build_state, provider::ProviderKind};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("proclubs_dashboard=info")),
        )
        .init();

    let state = build_state(&config)?;
    if config.provider == ProviderKind::Official {
        info!(
            platform = %config.platform,
            label = platform_label(&config.platform).unwrap_or("custom"),
            "official provider platform"
        );
    }
    info!(
        provider = state.provider.name(),
        clubs = state.directory.len(),
        cache_ttl_secs = config.cache_ttl.as_secs(),
        "starting pro clubs dashboard"
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
