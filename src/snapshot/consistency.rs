//! Snapshot consistency validation.
//!
//! # Responsibilities
//! - Verify every route's target cluster exists within the same snapshot
//! - Verify every listener carries a well-formed inline route table
//!
//! # Design Decisions
//! - Pure and total: never mutates, never fails on transient conditions;
//!   a failure here is an authoring or compiler defect
//! - Runs on every candidate snapshot before publication

use std::collections::HashSet;

use thiserror::Error;

use crate::resources::listener::Listener;
use crate::resources::route::RouteConfiguration;
use crate::resources::{Resource, CLUSTER_TYPE_URL, LISTENER_TYPE_URL, ROUTE_TYPE_URL};
use crate::snapshot::Snapshot;

/// Errors produced when a snapshot's cross-references do not resolve.
#[derive(Debug, Error)]
pub enum ConsistencyError {
    /// A route targets a cluster that is not part of the snapshot.
    #[error("route table {route_config:?} targets unknown cluster {cluster:?}")]
    DanglingClusterRef {
        route_config: String,
        cluster: String,
    },

    /// A listener's embedded route table is missing or ill-shaped.
    #[error("listener {listener:?} has a malformed route table: {reason}")]
    MalformedRoute { listener: String, reason: String },
}

/// Check that every cross-resource reference in the snapshot resolves
/// inside that same snapshot.
pub fn validate(snapshot: &Snapshot) -> Result<(), ConsistencyError> {
    let cluster_names: HashSet<&str> = snapshot
        .resources_of(CLUSTER_TYPE_URL)
        .iter()
        .map(Resource::name)
        .collect();

    for resource in snapshot.resources_of(ROUTE_TYPE_URL) {
        if let Resource::RouteConfiguration(route_config) = resource {
            check_cluster_refs(route_config, &cluster_names)?;
        }
    }

    for resource in snapshot.resources_of(LISTENER_TYPE_URL) {
        if let Resource::Listener(listener) = resource {
            validate_listener(listener, &cluster_names)?;
        }
    }

    Ok(())
}

fn validate_listener(
    listener: &Listener,
    cluster_names: &HashSet<&str>,
) -> Result<(), ConsistencyError> {
    let malformed = |reason: &str| ConsistencyError::MalformedRoute {
        listener: listener.name.clone(),
        reason: reason.to_string(),
    };

    if listener.filter_chains.is_empty() {
        return Err(malformed("no filter chains"));
    }

    let mut managers = listener
        .filter_chains
        .iter()
        .flat_map(|chain| &chain.filters)
        .filter_map(|filter| filter.typed_config.as_ref());

    let Some(manager) = managers.next() else {
        return Err(malformed("no inline route table"));
    };

    if manager.http_filters.is_empty() {
        return Err(malformed("no terminal routing filter"));
    }

    let route_config = &manager.route_config;
    for virtual_host in &route_config.virtual_hosts {
        for route in &virtual_host.routes {
            if route.route_match.prefix.is_empty() {
                return Err(malformed("route entry with an empty prefix match"));
            }
            if route.action.cluster.is_empty() {
                return Err(malformed("route entry with an empty cluster target"));
            }
        }
    }

    check_cluster_refs(route_config, cluster_names)
}

fn check_cluster_refs(
    route_config: &RouteConfiguration,
    cluster_names: &HashSet<&str>,
) -> Result<(), ConsistencyError> {
    for virtual_host in &route_config.virtual_hosts {
        for route in &virtual_host.routes {
            if !cluster_names.contains(route.action.cluster.as_str()) {
                return Err(ConsistencyError::DanglingClusterRef {
                    route_config: route_config.name.clone(),
                    cluster: route.action.cluster.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::core::SocketAddress;
    use crate::resources::listener::{FilterChain, NetworkFilter};
    use crate::resources::wellknown;
    use crate::rules;
    use crate::snapshot::compiler::{compile, NodeConfig};

    fn compiled() -> Snapshot {
        compile(&NodeConfig {
            node_id: "n1".to_string(),
            version: "1".to_string(),
            cluster_name_prefix: "edge".to_string(),
            listener_host: "0.0.0.0".to_string(),
            listener_port: 10000,
            rules: vec![
                rules::parse("/api -> backend1:8080").unwrap(),
                rules::parse("/ -> backend2").unwrap(),
            ],
        })
        .unwrap()
    }

    #[test]
    fn test_compiled_snapshots_validate() {
        assert!(validate(&compiled()).is_ok());
    }

    #[test]
    fn test_empty_snapshot_validates() {
        let snapshot = Snapshot::new("1", []);
        assert!(validate(&snapshot).is_ok());
    }

    #[test]
    fn test_dangling_cluster_ref() {
        let compiled = compiled();
        // Keep the listener, drop the clusters it references.
        let snapshot = Snapshot::new(
            "1",
            [(
                LISTENER_TYPE_URL,
                compiled.resources_of(LISTENER_TYPE_URL).to_vec(),
            )],
        );

        assert!(matches!(
            validate(&snapshot),
            Err(ConsistencyError::DanglingClusterRef { cluster, .. })
                if cluster == "edge-/api-backend1"
        ));
    }

    #[test]
    fn test_listener_without_route_table_is_malformed() {
        let listener = Listener {
            name: "n1-listener".to_string(),
            address: SocketAddress::tcp("0.0.0.0", 10000),
            filter_chains: vec![FilterChain {
                filters: vec![NetworkFilter {
                    name: wellknown::HTTP_CONNECTION_MANAGER.to_string(),
                    typed_config: None,
                }],
            }],
        };
        let snapshot = Snapshot::new("1", [(LISTENER_TYPE_URL, vec![Resource::Listener(listener)])]);

        assert!(matches!(
            validate(&snapshot),
            Err(ConsistencyError::MalformedRoute { .. })
        ));
    }

    #[test]
    fn test_listener_without_filter_chains_is_malformed() {
        let listener = Listener {
            name: "n1-listener".to_string(),
            address: SocketAddress::tcp("0.0.0.0", 10000),
            filter_chains: vec![],
        };
        let snapshot = Snapshot::new("1", [(LISTENER_TYPE_URL, vec![Resource::Listener(listener)])]);

        assert!(matches!(
            validate(&snapshot),
            Err(ConsistencyError::MalformedRoute { reason, .. }) if reason == "no filter chains"
        ));
    }

    #[test]
    fn test_standalone_route_config_is_checked() {
        let compiled = compiled();
        let tables = compiled.route_configurations();
        let snapshot = Snapshot::new(
            "1",
            [(
                ROUTE_TYPE_URL,
                vec![Resource::RouteConfiguration(tables[0].clone())],
            )],
        );

        assert!(matches!(
            validate(&snapshot),
            Err(ConsistencyError::DanglingClusterRef { .. })
        ));
    }
}
