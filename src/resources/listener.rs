//! Listener definitions.

use serde::{Deserialize, Serialize};

use crate::resources::core::SocketAddress;
use crate::resources::route::RouteConfiguration;

/// A proxy-side network bind point plus its filter chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listener {
    pub name: String,
    pub address: SocketAddress,
    pub filter_chains: Vec<FilterChain>,
}

/// An ordered set of network filters applied to accepted connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterChain {
    pub filters: Vec<NetworkFilter>,
}

/// A named network filter. The only typed configuration this control
/// plane emits is the HTTP connection manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkFilter {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub typed_config: Option<HttpConnectionManager>,
}

/// HTTP codec selection for the connection manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CodecType {
    Auto,
    Http1,
    Http2,
}

/// HTTP connection manager filter with the node's route table embedded
/// inline rather than referenced through a separate discovery request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConnectionManager {
    pub codec_type: CodecType,

    /// Prefix for stats emitted by the data plane for this listener.
    pub stat_prefix: String,

    pub route_config: RouteConfiguration,

    /// HTTP-level filters; the router filter must come last.
    pub http_filters: Vec<HttpFilter>,
}

/// A named HTTP-level filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpFilter {
    pub name: String,
}
