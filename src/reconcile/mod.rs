//! Reconciliation loop.
//!
//! # Data Flow
//! ```text
//! periodic tick (or rule-document change event)
//!     → load rule document (source)
//!     → per node: parse rules → compile → validate
//!     → structural diff against the stored snapshot
//!     → publish into the snapshot store when changed
//! ```
//!
//! # State Machine
//! Idle → Reconciling on each tick; Reconciling → Idle on pass
//! completion, regardless of per-node outcome. At most one pass is in
//! flight: the loop is a single task and both triggers funnel into the
//! same pass execution.
//!
//! # Design Decisions
//! - Nodes reconcile independently: one node's failure never aborts the
//!   pass, and the failing node keeps serving its last good snapshot
//! - Versions are a per-node monotonic counter derived from the stored
//!   snapshot; change detection relies on deterministic compilation
//! - A document that fails to load skips the whole pass; the next tick
//!   retries

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use crate::config::ControlPlaneConfig;
use crate::observability::metrics;
use crate::rules::{self, ParseError};
use crate::snapshot::{compiler, consistency, CompileError, ConsistencyError, NodeConfig};
use crate::source::{self, NodeSpec};
use crate::store::{SnapshotStore, StoreError};

/// Errors that fail reconciliation of a single node. Deterministic
/// functions of the node's input; the node's prior snapshot remains
/// authoritative.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Consistency(#[from] ConsistencyError),

    /// Unexpected store rejection. Stale versions are handled as a
    /// no-op before this surfaces.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of reconciling a single node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeOutcome {
    /// A new snapshot version was published.
    Published { version: String },

    /// The compiled snapshot matches the stored one; nothing published.
    Unchanged { version: String },

    /// The store already holds a newer version (overlapping publication);
    /// the newer version wins.
    Superseded { version: String },
}

/// Aggregated outcome of one reconciliation pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PassSummary {
    pub nodes: usize,
    pub published: usize,
    pub unchanged: usize,
    pub superseded: usize,
    pub failed: usize,
}

/// The periodic reconciliation task. Sole writer to the snapshot store.
pub struct Reconciler {
    store: Arc<SnapshotStore>,
    source_path: PathBuf,
    interval: Duration,
    cluster_name_prefix: String,
}

impl Reconciler {
    pub fn new(store: Arc<SnapshotStore>, config: &ControlPlaneConfig) -> Self {
        Self {
            store,
            source_path: PathBuf::from(&config.source.path),
            interval: Duration::from_secs(config.reconcile.interval_secs),
            cluster_name_prefix: config.reconcile.cluster_name_prefix.clone(),
        }
    }

    /// Run the loop until the shutdown signal fires.
    ///
    /// `reload_rx` delivers document-change events from the watcher; a
    /// closed channel simply leaves the periodic tick as the only
    /// trigger.
    pub async fn run(
        self,
        mut shutdown: broadcast::Receiver<()>,
        mut reload_rx: mpsc::UnboundedReceiver<()>,
    ) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            source = %self.source_path.display(),
            interval_secs = self.interval.as_secs(),
            "Reconciliation loop started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.execute_pass().await;
                }
                Some(_) = reload_rx.recv() => {
                    tracing::info!("Rule document changed, reconciling immediately");
                    self.execute_pass().await;
                    ticker.reset();
                }
                _ = shutdown.recv() => {
                    tracing::info!("Reconciliation loop stopping");
                    break;
                }
            }
        }
    }

    /// Load the rule document and run one pass over it.
    pub async fn execute_pass(&self) {
        let pass_id = Uuid::new_v4();
        let started = Instant::now();

        let document = match source::load_document(&self.source_path).await {
            Ok(document) => document,
            Err(error) => {
                tracing::warn!(
                    %pass_id,
                    source = %self.source_path.display(),
                    %error,
                    "Skipping reconciliation pass: rule document unavailable"
                );
                metrics::record_pass_skipped();
                return;
            }
        };

        let summary = self.run_pass(&document);

        metrics::record_pass(&summary, started.elapsed());
        metrics::record_store_size(self.store.len());
        tracing::info!(
            %pass_id,
            nodes = summary.nodes,
            published = summary.published,
            unchanged = summary.unchanged,
            failed = summary.failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Reconciliation pass complete"
        );
    }

    /// Reconcile every node in the document independently.
    pub fn run_pass(&self, document: &[NodeSpec]) -> PassSummary {
        let mut summary = PassSummary {
            nodes: document.len(),
            ..PassSummary::default()
        };

        for spec in document {
            match self.reconcile_node(spec) {
                Ok(NodeOutcome::Published { version }) => {
                    tracing::info!(node_id = %spec.node_id, %version, "Published snapshot");
                    summary.published += 1;
                }
                Ok(NodeOutcome::Unchanged { version }) => {
                    tracing::debug!(node_id = %spec.node_id, %version, "Snapshot unchanged");
                    summary.unchanged += 1;
                }
                Ok(NodeOutcome::Superseded { version }) => {
                    tracing::debug!(
                        node_id = %spec.node_id,
                        winner = %version,
                        "Publication superseded by a newer stored version"
                    );
                    summary.superseded += 1;
                }
                Err(error) => {
                    tracing::warn!(
                        node_id = %spec.node_id,
                        %error,
                        "Node reconciliation failed; last good snapshot stays authoritative"
                    );
                    summary.failed += 1;
                }
            }
        }

        summary
    }

    /// Parse, compile, validate, and (when changed) publish one node.
    fn reconcile_node(&self, spec: &NodeSpec) -> Result<NodeOutcome, ReconcileError> {
        let rules = spec
            .domains
            .iter()
            .map(|raw| rules::parse(raw))
            .collect::<Result<Vec<_>, _>>()?;

        let current = self.store.get(&spec.node_id).ok();
        let next_version = next_version(current.as_deref().map(|s| s.version()));

        let node_config = NodeConfig {
            node_id: spec.node_id.clone(),
            version: next_version.clone(),
            cluster_name_prefix: self.cluster_name_prefix.clone(),
            listener_host: spec.listener_host.clone(),
            listener_port: spec.listener_port,
            rules,
        };

        let candidate = compiler::compile(&node_config)?;
        consistency::validate(&candidate)?;

        if let Some(current) = &current {
            if current.same_resources(&candidate) {
                return Ok(NodeOutcome::Unchanged {
                    version: current.version().to_string(),
                });
            }
        }

        match self.store.set(&spec.node_id, candidate) {
            Ok(()) => Ok(NodeOutcome::Published {
                version: next_version,
            }),
            Err(StoreError::StaleVersion { current, .. }) => {
                Ok(NodeOutcome::Superseded { version: current })
            }
            Err(error) => Err(error.into()),
        }
    }
}

/// Next monotonic version for a node: stored version plus one, or 1 for
/// a node without a snapshot (or with a non-numeric stored version).
fn next_version(current: Option<&str>) -> String {
    current
        .and_then(|version| version.parse::<u64>().ok())
        .map(|version| version + 1)
        .unwrap_or(1)
        .to_string()
}
