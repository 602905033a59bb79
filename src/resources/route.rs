//! Route configuration definitions.

use serde::{Deserialize, Serialize};

/// A node's route table: an ordered set of virtual hosts and routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteConfiguration {
    pub name: String,
    pub virtual_hosts: Vec<VirtualHost>,
}

/// A set of routes served for a set of request authorities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualHost {
    pub name: String,

    /// Host/authority patterns this virtual host serves ("*" for all).
    pub domains: Vec<String>,

    /// Ordered route entries; the first matching entry wins.
    pub routes: Vec<Route>,
}

/// A single route entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    #[serde(rename = "match")]
    pub route_match: RouteMatch,

    #[serde(rename = "route")]
    pub action: RouteAction,
}

/// Request-matching condition. Prefix matching only; declaration order
/// is the match-priority order, with no longest-prefix tie-break.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteMatch {
    pub prefix: String,
}

/// What to do with a matched request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteAction {
    /// Name of the target cluster. Must resolve within the same snapshot.
    pub cluster: String,

    /// Literal value the outbound Host header is rewritten to.
    pub host_rewrite_literal: String,
}
