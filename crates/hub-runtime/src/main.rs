//! # Energy Hub Runtime
//!
//! Entry point: loads `HubConfig` from the environment, starts the runtime
//! and waits for Ctrl+C.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use hub_runtime::{HubConfig, HubRuntime};

#[tokio::main]
async fn main() -> Result<()> {
    let config = HubConfig::from_env().context("loading configuration")?;

    // RUST_LOG wins over EH_LOG_LEVEL.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .context("building log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!(
        registry = ?config.storage.registry_backend,
        bus_capacity = config.bus.channel_capacity,
        "Energy hub configuration loaded"
    );

    let runtime = HubRuntime::new(config).context("building hub container")?;
    runtime.start();

    info!("Energy hub is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    runtime.shutdown().await;
    Ok(())
}
