//! PlayStatus daemon.
//!
//! Wires the event feed, the aggregator, and the status server together
//! and runs until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `playstatus.yaml` (or `PLAYSTATUS_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Create the aggregator and its snapshot store
//! 4. Create the broadcast hub and start the aggregator task
//! 5. Bind and spawn the status server
//! 6. Read newline-delimited JSON events from stdin
//! 7. On `Ctrl-C`, stop the server and drain the aggregator

mod error;
mod feed;

use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

use playstatus_core::config::StatusConfig;
use playstatus_core::{EventAggregator, PublishCallback, intake, run_aggregator};
use playstatus_server::{AppState, BroadcastHub, ServerConfig, spawn_server};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::DaemonError;
use crate::feed::{Feed, run_feed, spawn_line_reader};

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "playstatus.yaml";

/// Lines the stdin reader may queue ahead of the feed.
const FEED_LINE_BUFFER: usize = 64;

#[tokio::main]
async fn main() -> Result<(), DaemonError> {
    // 1. Load configuration.
    let (config, source) = load_config()?;

    // 2. Initialize structured logging. RUST_LOG wins over the config.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("playstatus-daemon starting");
    match &source {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => info!("Config file not found, using defaults"),
    }

    // 3. Create the aggregator.
    let aggregator = EventAggregator::new(&config.game)?;
    let store = aggregator.store();

    // 4. Create the hub and start folding.
    let hub = Arc::new(BroadcastHub::new(
        store.clone(),
        config.broadcast.subscriber_buffer,
    ));
    let (event_intake, intake_rx) = intake::channel();
    let hub_callback: Arc<dyn PublishCallback> = hub.clone();
    let callbacks = vec![hub_callback];
    let aggregator_handle = tokio::spawn(run_aggregator(aggregator, intake_rx, callbacks));

    // 5. Start the status server.
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let state = Arc::new(AppState::new(store, Arc::clone(&hub)));
    let (addr, server_handle) = spawn_server(
        &ServerConfig::from(&config.server),
        state,
        async move {
            let _ = shutdown_rx.changed().await;
        },
    )
    .await?;
    info!(%addr, "Serving GET /status.json and GET /socket");

    // 6. Feed events from stdin. The feed holds the only intake handle, so
    //    the aggregator stops once the feed is done.
    let feed = Feed::new(event_intake, config.pool.initial_capacity);
    let lines = spawn_line_reader(BufReader::new(std::io::stdin()), FEED_LINE_BUFFER)?;
    let feed_handle = tokio::spawn(run_feed(lines, feed));

    // 7. Run until Ctrl-C.
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C, shutting down");
    }
    info!("Shutdown requested");

    feed_handle.abort();
    match feed_handle.await {
        Ok(Ok(lines)) => info!(lines, "Event feed finished"),
        Ok(Err(e)) => warn!(error = %e, "Event feed failed"),
        Err(e) if e.is_cancelled() => {}
        Err(e) => return Err(e.into()),
    }

    let _ = shutdown_tx.send(true);
    server_handle.await?;

    let revision = aggregator_handle.await?;
    info!(revision, subscribers = hub.subscriber_count(), "playstatus-daemon stopped");
    Ok(())
}

/// Load configuration from `PLAYSTATUS_CONFIG` or `playstatus.yaml`.
///
/// A missing file yields defaults (with environment overrides applied).
/// Returns the path the configuration was read from, if any.
fn load_config() -> Result<(StatusConfig, Option<PathBuf>), DaemonError> {
    let path = std::env::var_os("PLAYSTATUS_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if path.exists() {
        let config = StatusConfig::from_file(&path)?;
        Ok((config, Some(path)))
    } else {
        Ok((StatusConfig::parse("")?, None))
    }
}
