//! Shared utilities for integration testing.

use std::path::PathBuf;

use proxy_control_plane::config::ControlPlaneConfig;

/// Write a rule document to a unique temp path and return the path.
pub fn write_document(content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("routes-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, content).unwrap();
    path
}

/// Config pointing at the given document, tuned for tests: fast ticks,
/// no watcher, no metrics, no server.
pub fn test_config(document_path: &PathBuf) -> ControlPlaneConfig {
    let mut config = ControlPlaneConfig::default();
    config.source.path = document_path.to_string_lossy().to_string();
    config.source.watch = false;
    config.reconcile.interval_secs = 1;
    config.reconcile.cluster_name_prefix = "edge".to_string();
    config.server.enabled = false;
    config.observability.metrics_enabled = false;
    config
}

/// A two-node document: one API node, one catch-all node.
pub fn sample_document() -> &'static str {
    r#"[
        {"node": "n1", "host": "0.0.0.0", "port": 10000,
         "domains": ["/api -> backend1:8080", "/ -> backend2"]},
        {"node": "n2", "host": "127.0.0.1", "port": 10001,
         "domains": ["/static -> assets:9000"]}
    ]"#
}
