//! Rule-document watcher.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

/// Watches the rule document and emits a reload event on change.
///
/// The watcher does not load the document itself; the reconciliation
/// loop owns loading so that tick- and event-driven passes share one
/// code path.
pub struct DocumentWatcher {
    path: PathBuf,
    event_tx: mpsc::UnboundedSender<()>,
}

impl DocumentWatcher {
    /// Create a new watcher for the given document path.
    ///
    /// Returns the watcher and the receiver for reload events.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<()>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                event_tx,
            },
            event_rx,
        )
    }

    /// Start watching the document in a background thread.
    ///
    /// The returned handle must be kept alive for the watch to stay
    /// registered.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.event_tx.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |result: notify::Result<Event>| match result {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::debug!(path = ?path, "Rule document change detected");
                        let _ = tx.send(());
                    }
                }
                Err(error) => tracing::error!(?error, "Rule document watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Rule document watcher started");
        Ok(watcher)
    }
}
