//! Well-known filter names understood by the data plane.

/// The HTTP connection manager network filter.
pub const HTTP_CONNECTION_MANAGER: &str = "envoy.filters.network.http_connection_manager";

/// The terminal HTTP router filter.
pub const ROUTER: &str = "envoy.filters.http.router";
