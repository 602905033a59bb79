//! Proxy control plane.
//!
//! # Architecture Overview
//!
//! ```text
//!   rule document (JSON)          ┌──────────────────────────────────────┐
//!   ──────────────────────────── ▶│  source      reconcile               │
//!        (tick / file watch)      │  loader  ──▶ parse → compile →       │
//!                                 │              validate → publish      │
//!                                 │                          │           │
//!                                 │                          ▼           │
//!                                 │                   snapshot store     │
//!                                 │                (per-node, versioned) │
//!                                 │                          │           │
//!   data-plane proxies            │                          ▼           │
//!   ◀──────────────────────────── │                discovery API (read)  │
//!                                 └──────────────────────────────────────┘
//! ```
//!
//! The reconciler is the sole writer to the snapshot store; the discovery
//! API and any number of connected consumers only read.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use proxy_control_plane::config::{load_config, ControlPlaneConfig};
use proxy_control_plane::lifecycle::{shutdown_signal, Shutdown};
use proxy_control_plane::observability::{logging, metrics};
use proxy_control_plane::reconcile::Reconciler;
use proxy_control_plane::server;
use proxy_control_plane::source::DocumentWatcher;
use proxy_control_plane::store::SnapshotStore;

#[derive(Parser)]
#[command(name = "proxy-control-plane")]
#[command(about = "Compiles routing rules into versioned proxy snapshots", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file (defaults apply when omitted).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ControlPlaneConfig::default(),
    };

    logging::init(&config.observability.log_level);

    tracing::info!(
        source = %config.source.path,
        interval_secs = config.reconcile.interval_secs,
        cluster_name_prefix = %config.reconcile.cluster_name_prefix,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let store = Arc::new(SnapshotStore::new());
    let shutdown = Arc::new(Shutdown::new());

    // Translate OS signals into the shutdown broadcast.
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received");
            shutdown.trigger();
        });
    }

    // Rule-document watcher; the handle must stay alive for the watch to
    // remain registered. A closed channel leaves tick-only reconciling.
    let (reload_rx, _watcher) = if config.source.watch {
        let (watcher, reload_rx) = DocumentWatcher::new(Path::new(&config.source.path));
        match watcher.run() {
            Ok(handle) => (reload_rx, Some(handle)),
            Err(error) => {
                tracing::error!(%error, "Failed to start document watcher; relying on periodic ticks");
                (mpsc::unbounded_channel().1, None)
            }
        }
    } else {
        (mpsc::unbounded_channel().1, None)
    };

    let reconciler = Reconciler::new(store.clone(), &config);
    let reconcile_task = tokio::spawn(reconciler.run(shutdown.subscribe(), reload_rx));

    if config.server.enabled {
        let listener = TcpListener::bind(&config.server.bind_address).await?;
        server::serve(listener, store.clone(), &config.server, shutdown.subscribe()).await?;
    } else {
        let mut wait = shutdown.subscribe();
        let _ = wait.recv().await;
    }

    let _ = reconcile_task.await;
    tracing::info!("Shutdown complete");
    Ok(())
}
