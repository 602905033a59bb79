//! Rule-document schema and loading.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One node descriptor from the rule document.
///
/// ```json
/// {"node": "n1", "host": "0.0.0.0", "port": 10000,
///  "domains": ["/api -> backend1:8080", "/ -> backend2"]}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Stable ID of the managed proxy instance.
    #[serde(rename = "node")]
    pub node_id: String,

    /// Document-declared version. Accepted for compatibility; the
    /// reconciler assigns published versions itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Address the node's listener binds to.
    #[serde(rename = "host")]
    pub listener_host: String,

    #[serde(rename = "port")]
    pub listener_port: u16,

    /// Raw routing rules in match-priority order.
    #[serde(default)]
    pub domains: Vec<String>,
}

/// The decoded rule document: an ordered sequence of node descriptors.
pub type RuleDocument = Vec<NodeSpec>;

/// Errors produced while loading the rule document. Either one fails the
/// whole reconciliation pass.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read rule document: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode rule document: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Read and decode the rule document from disk.
pub async fn load_document(path: &Path) -> Result<RuleDocument, SourceError> {
    let raw = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&raw)?)
}
