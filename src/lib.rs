//! Proxy control plane library.

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod reconcile;
pub mod resources;
pub mod rules;
pub mod server;
pub mod snapshot;
pub mod source;
pub mod store;

pub use config::schema::ControlPlaneConfig;
pub use lifecycle::Shutdown;
pub use reconcile::Reconciler;
pub use snapshot::Snapshot;
pub use store::SnapshotStore;
