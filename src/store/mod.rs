//! Snapshot store.
//!
//! # Data Flow
//! ```text
//! Reconciliation loop (sole writer)
//!     → set(node_id, snapshot)   [atomic replace, stale versions rejected]
//! Discovery API (concurrent readers)
//!     → get(node_id) → Arc<Snapshot>
//! ```
//!
//! # Design Decisions
//! - Copy-on-write: a set publishes a new immutable Arc<Snapshot>; readers
//!   holding the previous Arc keep a consistent view
//! - Version ordering protects against out-of-order publication from
//!   overlapping reconciliation passes
//! - No deletion path: a node removed from the rule document keeps
//!   serving its last snapshot

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;

use crate::snapshot::Snapshot;

/// Errors produced by snapshot store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No snapshot has been published for the node.
    #[error("no snapshot stored for node {node_id:?}")]
    NotFound { node_id: String },

    /// The offered version is not strictly greater than the stored one.
    #[error("stale version {offered:?} for node {node_id:?}: current is {current:?}")]
    StaleVersion {
        node_id: String,
        current: String,
        offered: String,
    },
}

/// Per-node keyed cache holding the current snapshot of each node.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    entries: DashMap<String, Arc<Snapshot>>,
}

impl SnapshotStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically replace the current snapshot for a node.
    ///
    /// The swap happens under the entry lock, so concurrent readers
    /// observe either the previous snapshot or the new one, never a
    /// partial state. A version that is not strictly greater than the
    /// stored one is rejected.
    pub fn set(&self, node_id: &str, snapshot: Snapshot) -> Result<(), StoreError> {
        match self.entries.entry(node_id.to_string()) {
            Entry::Occupied(mut current) => {
                if !version_newer(snapshot.version(), current.get().version()) {
                    return Err(StoreError::StaleVersion {
                        node_id: node_id.to_string(),
                        current: current.get().version().to_string(),
                        offered: snapshot.version().to_string(),
                    });
                }
                current.insert(Arc::new(snapshot));
            }
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(snapshot));
            }
        }
        Ok(())
    }

    /// Current snapshot for a node.
    pub fn get(&self, node_id: &str) -> Result<Arc<Snapshot>, StoreError> {
        self.entries
            .get(node_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound {
                node_id: node_id.to_string(),
            })
    }

    /// IDs of every node with a published snapshot, sorted.
    pub fn node_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.entries.iter().map(|entry| entry.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Number of nodes with a published snapshot.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Version ordering convention: numeric when both versions parse as
/// unsigned integers, lexicographic otherwise.
fn version_newer(offered: &str, current: &str) -> bool {
    match (offered.parse::<u64>(), current.parse::<u64>()) {
        (Ok(offered), Ok(current)) => offered > current,
        _ => offered > current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(version: &str) -> Snapshot {
        Snapshot::new(version, [])
    }

    #[test]
    fn test_get_unknown_node() {
        let store = SnapshotStore::new();
        assert!(matches!(
            store.get("n1"),
            Err(StoreError::NotFound { node_id }) if node_id == "n1"
        ));
    }

    #[test]
    fn test_set_then_get() {
        let store = SnapshotStore::new();
        store.set("n1", snapshot("1")).unwrap();

        let stored = store.get("n1").unwrap();
        assert_eq!(stored.version(), "1");
        assert_eq!(store.node_ids(), vec!["n1".to_string()]);
    }

    #[test]
    fn test_newer_version_replaces() {
        let store = SnapshotStore::new();
        store.set("n1", snapshot("1")).unwrap();
        store.set("n1", snapshot("2")).unwrap();

        assert_eq!(store.get("n1").unwrap().version(), "2");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_stale_version_rejected() {
        let store = SnapshotStore::new();
        store.set("n1", snapshot("2")).unwrap();

        assert!(matches!(
            store.set("n1", snapshot("2")),
            Err(StoreError::StaleVersion { .. })
        ));
        assert!(matches!(
            store.set("n1", snapshot("1")),
            Err(StoreError::StaleVersion { current, offered, .. })
                if current == "2" && offered == "1"
        ));

        // The stored snapshot is untouched by rejected writes.
        assert_eq!(store.get("n1").unwrap().version(), "2");
    }

    #[test]
    fn test_versions_compare_numerically() {
        let store = SnapshotStore::new();
        store.set("n1", snapshot("9")).unwrap();

        // Lexicographically "10" < "9"; numerically it is newer.
        store.set("n1", snapshot("10")).unwrap();
        assert_eq!(store.get("n1").unwrap().version(), "10");
    }

    #[test]
    fn test_readers_keep_their_snapshot_across_swaps() {
        let store = SnapshotStore::new();
        store.set("n1", snapshot("1")).unwrap();

        let held = store.get("n1").unwrap();
        store.set("n1", snapshot("2")).unwrap();

        // The old Arc stays consistent for readers that grabbed it.
        assert_eq!(held.version(), "1");
        assert_eq!(store.get("n1").unwrap().version(), "2");
    }

    #[test]
    fn test_nodes_are_independent() {
        let store = SnapshotStore::new();
        store.set("n1", snapshot("5")).unwrap();
        store.set("n2", snapshot("1")).unwrap();

        assert_eq!(store.node_ids(), vec!["n1".to_string(), "n2".to_string()]);
        assert_eq!(store.get("n2").unwrap().version(), "1");
    }
}
