//! Proxy resource model.
//!
//! Envoy v3-shaped definitions for the three resource kinds the control
//! plane emits: clusters, route configurations, and listeners. Resources
//! are plain serde-serializable structs so the discovery API can serve
//! them as JSON, and they derive `PartialEq` so snapshots can be compared
//! structurally for change detection.

pub mod cluster;
pub mod core;
pub mod listener;
pub mod route;
pub mod wellknown;

use serde::{Deserialize, Serialize};

pub use cluster::{
    Cluster, ClusterLoadAssignment, DiscoveryType, DnsLookupFamily, LbEndpoint, LbPolicy,
    LocalityLbEndpoints,
};
pub use self::core::{SocketAddress, TransportProtocol};
pub use listener::{CodecType, FilterChain, HttpConnectionManager, HttpFilter, Listener, NetworkFilter};
pub use route::{Route, RouteAction, RouteConfiguration, RouteMatch, VirtualHost};

/// Type URL identifying cluster resources in a snapshot.
pub const CLUSTER_TYPE_URL: &str = "type.googleapis.com/envoy.config.cluster.v3.Cluster";

/// Type URL identifying route-configuration resources in a snapshot.
pub const ROUTE_TYPE_URL: &str = "type.googleapis.com/envoy.config.route.v3.RouteConfiguration";

/// Type URL identifying listener resources in a snapshot.
pub const LISTENER_TYPE_URL: &str = "type.googleapis.com/envoy.config.listener.v3.Listener";

/// A single typed configuration resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Resource {
    Cluster(Cluster),
    RouteConfiguration(RouteConfiguration),
    Listener(Listener),
}

impl Resource {
    /// Unique name of the resource within its type.
    pub fn name(&self) -> &str {
        match self {
            Resource::Cluster(cluster) => &cluster.name,
            Resource::RouteConfiguration(route_config) => &route_config.name,
            Resource::Listener(listener) => &listener.name,
        }
    }

    /// Type URL this resource is keyed under.
    pub fn type_url(&self) -> &'static str {
        match self {
            Resource::Cluster(_) => CLUSTER_TYPE_URL,
            Resource::RouteConfiguration(_) => ROUTE_TYPE_URL,
            Resource::Listener(_) => LISTENER_TYPE_URL,
        }
    }
}
