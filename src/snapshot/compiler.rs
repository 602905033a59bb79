//! Snapshot compilation.
//!
//! # Responsibilities
//! - Derive one cluster (with a single-endpoint load assignment) per rule
//! - Build the node's route table, ordered by rule declaration
//! - Build the node's listener with the route table embedded inline
//!
//! # Design Decisions
//! - Cluster names compose the configured prefix, the rule's path prefix,
//!   and the target host; a collision is a hard compile failure
//! - Route entries keep declaration order: first prefix match wins, rule
//!   ordering is the caller's disambiguation mechanism
//! - Deterministic: recompiling the same NodeConfig yields structurally
//!   identical resources, version aside

use std::collections::HashSet;

use thiserror::Error;

use crate::resources::cluster::{
    Cluster, ClusterLoadAssignment, DiscoveryType, DnsLookupFamily, LbEndpoint, LbPolicy,
    LocalityLbEndpoints,
};
use crate::resources::core::SocketAddress;
use crate::resources::listener::{
    CodecType, FilterChain, HttpConnectionManager, HttpFilter, Listener, NetworkFilter,
};
use crate::resources::route::{Route, RouteAction, RouteConfiguration, RouteMatch, VirtualHost};
use crate::resources::{wellknown, Resource, CLUSTER_TYPE_URL, LISTENER_TYPE_URL};
use crate::rules::DomainRule;
use crate::snapshot::Snapshot;

/// Upstream connection timeout applied to every compiled cluster.
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Stat prefix for the HTTP connection manager.
const STAT_PREFIX: &str = "http";

/// Virtual-host name for the node's single wildcard host.
const VIRTUAL_HOST_NAME: &str = "local_service";

/// Everything needed to compile one node's snapshot. Rebuilt from the
/// rule document on every reconciliation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeConfig {
    pub node_id: String,

    /// Version stamped onto the compiled snapshot.
    pub version: String,

    /// Prefix composed into every derived cluster name.
    pub cluster_name_prefix: String,

    pub listener_host: String,
    pub listener_port: u16,

    /// Routing rules in match-priority order.
    pub rules: Vec<DomainRule>,
}

impl NodeConfig {
    /// Name of the node's route table.
    pub fn route_name(&self) -> String {
        format!("{}-route", self.node_id)
    }

    /// Name of the node's listener.
    pub fn listener_name(&self) -> String {
        format!("{}-listener", self.node_id)
    }
}

/// Errors produced while compiling a snapshot.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Two rules derived the same resource name.
    #[error("duplicate resource name {name:?} derived for node {node_id:?}")]
    DuplicateResource { node_id: String, name: String },
}

/// Compile a node's configuration into a candidate snapshot.
///
/// The result still has to pass consistency validation before it may be
/// published.
pub fn compile(config: &NodeConfig) -> Result<Snapshot, CompileError> {
    let clusters = make_clusters(config)?;
    let listener = make_listener(config);

    Ok(Snapshot::new(
        config.version.clone(),
        [
            (CLUSTER_TYPE_URL, clusters),
            (LISTENER_TYPE_URL, vec![Resource::Listener(listener)]),
        ],
    ))
}

/// Derived cluster name for a rule. Must be unique within the snapshot.
fn cluster_name(prefix: &str, rule: &DomainRule) -> String {
    format!("{}-{}-{}", prefix, rule.source_prefix, rule.target_host)
}

fn make_clusters(config: &NodeConfig) -> Result<Vec<Resource>, CompileError> {
    let mut seen = HashSet::new();
    let mut clusters = Vec::with_capacity(config.rules.len());

    for rule in &config.rules {
        let name = cluster_name(&config.cluster_name_prefix, rule);
        if !seen.insert(name.clone()) {
            return Err(CompileError::DuplicateResource {
                node_id: config.node_id.clone(),
                name,
            });
        }

        clusters.push(Resource::Cluster(Cluster {
            name: name.clone(),
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            discovery_type: DiscoveryType::LogicalDns,
            lb_policy: LbPolicy::RoundRobin,
            dns_lookup_family: DnsLookupFamily::V4Only,
            load_assignment: make_load_assignment(name, rule),
        }));
    }

    Ok(clusters)
}

/// Single-endpoint assignment targeting the rule's upstream. Round-robin
/// is nominal with one endpoint but kept so clusters can grow endpoints
/// without a policy change.
fn make_load_assignment(cluster_name: String, rule: &DomainRule) -> ClusterLoadAssignment {
    ClusterLoadAssignment {
        cluster_name,
        endpoints: vec![LocalityLbEndpoints {
            lb_endpoints: vec![LbEndpoint {
                address: SocketAddress::tcp(&rule.target_host, rule.target_port),
            }],
        }],
    }
}

fn make_route_config(config: &NodeConfig) -> RouteConfiguration {
    let routes = config
        .rules
        .iter()
        .map(|rule| Route {
            route_match: RouteMatch {
                prefix: rule.source_prefix.clone(),
            },
            action: RouteAction {
                cluster: cluster_name(&config.cluster_name_prefix, rule),
                host_rewrite_literal: rule.target_host.clone(),
            },
        })
        .collect();

    RouteConfiguration {
        name: config.route_name(),
        virtual_hosts: vec![VirtualHost {
            name: VIRTUAL_HOST_NAME.to_string(),
            domains: vec!["*".to_string()],
            routes,
        }],
    }
}

fn make_listener(config: &NodeConfig) -> Listener {
    let manager = HttpConnectionManager {
        codec_type: CodecType::Auto,
        stat_prefix: STAT_PREFIX.to_string(),
        route_config: make_route_config(config),
        http_filters: vec![HttpFilter {
            name: wellknown::ROUTER.to_string(),
        }],
    };

    Listener {
        name: config.listener_name(),
        address: SocketAddress::tcp(&config.listener_host, config.listener_port),
        filter_chains: vec![FilterChain {
            filters: vec![NetworkFilter {
                name: wellknown::HTTP_CONNECTION_MANAGER.to_string(),
                typed_config: Some(manager),
            }],
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules;

    fn sample_config() -> NodeConfig {
        NodeConfig {
            node_id: "n1".to_string(),
            version: "1".to_string(),
            cluster_name_prefix: "edge".to_string(),
            listener_host: "0.0.0.0".to_string(),
            listener_port: 10000,
            rules: vec![
                rules::parse("/api -> backend1:8080").unwrap(),
                rules::parse("/ -> backend2").unwrap(),
            ],
        }
    }

    #[test]
    fn test_compile_derives_one_cluster_per_rule() {
        let snapshot = compile(&sample_config()).unwrap();
        let clusters = snapshot.resources_of(CLUSTER_TYPE_URL);

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].name(), "edge-/api-backend1");
        assert_eq!(clusters[1].name(), "edge-/-backend2");
    }

    #[test]
    fn test_compile_endpoint_targets_upstream() {
        let snapshot = compile(&sample_config()).unwrap();

        let Resource::Cluster(cluster) = &snapshot.resources_of(CLUSTER_TYPE_URL)[0] else {
            panic!("expected a cluster");
        };
        let endpoint = &cluster.load_assignment.endpoints[0].lb_endpoints[0];
        assert_eq!(endpoint.address.address, "backend1");
        assert_eq!(endpoint.address.port_value, 8080);
        assert_eq!(cluster.lb_policy, LbPolicy::RoundRobin);

        // Second rule omitted the port, so the endpoint defaults to 80.
        let Resource::Cluster(cluster) = &snapshot.resources_of(CLUSTER_TYPE_URL)[1] else {
            panic!("expected a cluster");
        };
        assert_eq!(
            cluster.load_assignment.endpoints[0].lb_endpoints[0]
                .address
                .port_value,
            80
        );
    }

    #[test]
    fn test_compile_route_table_keeps_declaration_order() {
        let snapshot = compile(&sample_config()).unwrap();
        let tables = snapshot.route_configurations();

        assert_eq!(tables.len(), 1);
        let table = tables[0];
        assert_eq!(table.name, "n1-route");

        let routes = &table.virtual_hosts[0].routes;
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].route_match.prefix, "/api");
        assert_eq!(routes[0].action.cluster, "edge-/api-backend1");
        assert_eq!(routes[0].action.host_rewrite_literal, "backend1");
        assert_eq!(routes[1].route_match.prefix, "/");
        assert_eq!(routes[1].action.cluster, "edge-/-backend2");
        assert_eq!(routes[1].action.host_rewrite_literal, "backend2");
    }

    #[test]
    fn test_compile_listener_embeds_route_table() {
        let snapshot = compile(&sample_config()).unwrap();
        let listeners: Vec<_> = snapshot.listeners().collect();

        assert_eq!(listeners.len(), 1);
        let listener = listeners[0];
        assert_eq!(listener.name, "n1-listener");
        assert_eq!(listener.address.address, "0.0.0.0");
        assert_eq!(listener.address.port_value, 10000);
        assert_eq!(listener.filter_chains.len(), 1);

        let filters = &listener.filter_chains[0].filters;
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0].name, wellknown::HTTP_CONNECTION_MANAGER);

        let manager = filters[0].typed_config.as_ref().unwrap();
        assert_eq!(manager.route_config.name, "n1-route");
        assert_eq!(manager.http_filters.len(), 1);
        assert_eq!(manager.http_filters[0].name, wellknown::ROUTER);
    }

    #[test]
    fn test_compile_is_deterministic_modulo_version() {
        let config = sample_config();
        let first = compile(&config).unwrap();

        let mut reversioned = config.clone();
        reversioned.version = "2".to_string();
        let second = compile(&reversioned).unwrap();

        assert!(first.same_resources(&second));
        assert_ne!(first.version(), second.version());
    }

    #[test]
    fn test_compile_rejects_duplicate_cluster_names() {
        let mut config = sample_config();
        config.rules = vec![
            rules::parse("/api -> backend1:8080").unwrap(),
            rules::parse("/api -> backend1:9090").unwrap(),
        ];

        assert!(matches!(
            compile(&config),
            Err(CompileError::DuplicateResource { name, .. }) if name == "edge-/api-backend1"
        ));
    }

    #[test]
    fn test_compile_empty_rule_set() {
        let mut config = sample_config();
        config.rules.clear();

        let snapshot = compile(&config).unwrap();
        assert!(snapshot.resources_of(CLUSTER_TYPE_URL).is_empty());
        assert_eq!(snapshot.listeners().count(), 1);
    }
}
