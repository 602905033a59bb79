//! Snapshot subsystem.
//!
//! # Data Flow
//! ```text
//! NodeConfig (identity + parsed rules)
//!     → compiler.rs (derive clusters, routes, listener)
//!     → Snapshot (versioned, typed resource sets)
//!     → consistency.rs (cross-reference checks)
//!     → published into the snapshot store
//! ```
//!
//! # Design Decisions
//! - A snapshot is immutable once built; a new version replaces it wholesale
//! - Resources are keyed by type URL so the discovery API can serve
//!   per-type requests directly
//! - Compilation is deterministic modulo the caller-supplied version,
//!   which makes change detection a structural equality check

pub mod compiler;
pub mod consistency;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::resources::{listener::Listener, route::RouteConfiguration, Resource};
use crate::resources::{LISTENER_TYPE_URL, ROUTE_TYPE_URL};

pub use compiler::{compile, CompileError, NodeConfig};
pub use consistency::{validate, ConsistencyError};

/// The complete, versioned, internally consistent set of configuration
/// resources for one node at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    version: String,
    resources: BTreeMap<String, Vec<Resource>>,
}

impl Snapshot {
    /// Build a snapshot from per-type resource sets.
    pub fn new<I>(version: impl Into<String>, resources: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Vec<Resource>)>,
    {
        Self {
            version: version.into(),
            resources: resources
                .into_iter()
                .map(|(type_url, set)| (type_url.to_string(), set))
                .collect(),
        }
    }

    /// Caller-assigned version of this snapshot.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Resources of one type, in compilation order. Unknown types yield
    /// an empty slice.
    pub fn resources_of(&self, type_url: &str) -> &[Resource] {
        self.resources
            .get(type_url)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Type URLs present in this snapshot.
    pub fn resource_types(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    /// Listeners contained in this snapshot.
    pub fn listeners(&self) -> impl Iterator<Item = &Listener> {
        self.resources_of(LISTENER_TYPE_URL)
            .iter()
            .filter_map(|resource| match resource {
                Resource::Listener(listener) => Some(listener),
                _ => None,
            })
    }

    /// All route tables in this snapshot: standalone route resources plus
    /// the tables embedded in listeners.
    pub fn route_configurations(&self) -> Vec<&RouteConfiguration> {
        let mut tables: Vec<&RouteConfiguration> = self
            .resources_of(ROUTE_TYPE_URL)
            .iter()
            .filter_map(|resource| match resource {
                Resource::RouteConfiguration(route_config) => Some(route_config),
                _ => None,
            })
            .collect();

        for listener in self.listeners() {
            for chain in &listener.filter_chains {
                for filter in &chain.filters {
                    if let Some(manager) = &filter.typed_config {
                        tables.push(&manager.route_config);
                    }
                }
            }
        }

        tables
    }

    /// Structural comparison ignoring the version field. Used for
    /// change detection between reconciliation passes.
    pub fn same_resources(&self, other: &Snapshot) -> bool {
        self.resources == other.resources
    }
}
