//! Arena authority entry point.
//!
//! Loads content, starts the runtime on a fixed tick, and logs simulation
//! events until interrupted. Sessions attach through
//! [`arena_runtime::RuntimeHandle`].
mod config;

use anyhow::{Context, Result};
use arena_content::ContentFactory;
use arena_runtime::{Event, Runtime, Topic};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use config::ServerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ServerConfig::from_env();
    info!(content_dir = %config.content_dir.display(), "Starting arena authority");

    let content = ContentFactory::new(config.content_dir.clone())
        .load()
        .with_context(|| format!("loading content from {}", config.content_dir.display()))?;

    let runtime = Runtime::builder()
        .config(config.runtime.clone())
        .content(content)
        .build()?;
    info!(
        tick_ms = config.runtime.tick_interval_ms,
        seed = config.runtime.game_seed,
        "Runtime started"
    );

    let observer = tokio::spawn(observe(runtime.subscribe(Topic::Simulation)));

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    info!("Shutdown requested");

    observer.abort();
    runtime.shutdown().await?;
    info!("Arena authority stopped");
    Ok(())
}

async fn observe(mut events: tokio::sync::broadcast::Receiver<Event>) {
    loop {
        match events.recv().await {
            Ok(event) => match event.to_json() {
                Ok(json) => debug!(target: "arena::events", "{json}"),
                Err(error) => warn!(%error, "event could not be encoded"),
            },
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "event observer lagged"),
            Err(RecvError::Closed) => break,
        }
    }
}
