//! hrcache admin server binary.

use std::path::PathBuf;

use anyhow::Context;
use hrcache_server::config::CONFIG_FILE_ENV;
use hrcache_server::metrics::{init_metrics, register_cache_metrics, register_http_metrics};
use hrcache_server::{AppState, CacheSettings, build_store, run_server_with_state};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_file = std::env::var_os(CONFIG_FILE_ENV).map(PathBuf::from);
    let settings =
        CacheSettings::load(config_file.as_deref()).context("failed to load cache settings")?;

    tracing::info!("Starting hrcache server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        active = settings.active,
        debug = settings.debug,
        backend = %settings.backend,
        default_ttl_secs = settings.default_ttl().as_secs(),
        "Cache settings loaded"
    );

    let prometheus = init_metrics().context("failed to install metrics recorder")?;
    register_cache_metrics();
    register_http_metrics();

    let store = build_store(&settings)
        .await
        .with_context(|| format!("failed to open {} cache store", settings.backend))?;

    let addr = settings.server.socket_addr()?;
    let state = AppState::new(store, settings);

    run_server_with_state(addr, state, prometheus).await?;

    Ok(())
}
