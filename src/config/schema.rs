//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the control plane.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ControlPlaneConfig {
    /// Rule-document source settings.
    pub source: SourceConfig,

    /// Reconciliation loop settings.
    pub reconcile: ReconcileConfig,

    /// Discovery API settings.
    pub server: ServerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Where the rule document lives and how changes are picked up.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Path to the JSON rule document.
    pub path: String,

    /// Watch the document and reconcile immediately on change, in
    /// addition to the periodic tick.
    pub watch: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: "routes.json".to_string(),
            watch: true,
        }
    }
}

/// Reconciliation loop settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Seconds between periodic reconciliation passes.
    pub interval_secs: u64,

    /// Prefix composed into every derived cluster name.
    pub cluster_name_prefix: String,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            interval_secs: 3,
            cluster_name_prefix: "edge".to_string(),
        }
    }
}

/// Discovery API settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Serve the read-only discovery API.
    pub enabled: bool,

    /// Bind address (e.g., "0.0.0.0:18000").
    pub bind_address: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: "0.0.0.0:18000".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
