//! Upstream cluster definitions.

use serde::{Deserialize, Serialize};

use crate::resources::core::SocketAddress;

/// How cluster endpoints are discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscoveryType {
    LogicalDns,
    StrictDns,
    Static,
}

/// Load-balancing policy across a cluster's endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LbPolicy {
    RoundRobin,
    LeastRequest,
}

/// Address family used for DNS resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DnsLookupFamily {
    V4Only,
    Auto,
}

/// A named upstream service that routes can reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Globally unique name within a node's snapshot.
    pub name: String,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    #[serde(rename = "type")]
    pub discovery_type: DiscoveryType,

    pub lb_policy: LbPolicy,

    pub dns_lookup_family: DnsLookupFamily,

    /// The cluster's endpoints, inlined.
    pub load_assignment: ClusterLoadAssignment,
}

/// Endpoint assignment for a cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterLoadAssignment {
    pub cluster_name: String,
    pub endpoints: Vec<LocalityLbEndpoints>,
}

/// Endpoints grouped by locality. Locality metadata is not modeled;
/// the grouping exists for forward compatibility with multi-endpoint
/// clusters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalityLbEndpoints {
    pub lb_endpoints: Vec<LbEndpoint>,
}

/// A single load-balanced endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LbEndpoint {
    pub address: SocketAddress,
}
