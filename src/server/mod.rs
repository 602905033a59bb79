//! Read-only discovery API.
//!
//! # Endpoints
//! - `GET /healthz`: liveness probe
//! - `GET /v3/discovery/nodes`: node IDs with a published snapshot
//! - `GET /v3/discovery/nodes/{node_id}`: the node's full snapshot
//! - `GET /v3/discovery/nodes/{node_id}/{kind}`: one resource type
//!   (`clusters`, `routes`, or `listeners`) as a discovery response
//!
//! # Design Decisions
//! - Strictly read-only: the reconciliation loop owns the write path
//! - Handlers clone an Arc<Snapshot> out of the store, so responses are
//!   always internally consistent even while a pass is publishing
//! - `routes` serves the route tables embedded in the node's listeners;
//!   the compiler emits no standalone route resources

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::resources::{Resource, CLUSTER_TYPE_URL, LISTENER_TYPE_URL, ROUTE_TYPE_URL};
use crate::snapshot::Snapshot;
use crate::store::SnapshotStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SnapshotStore>,
}

/// Response for a per-type discovery request.
#[derive(Debug, Serialize)]
pub struct DiscoveryResponse {
    pub version_info: String,
    pub type_url: String,
    pub resources: Vec<Resource>,
}

#[derive(Debug, Serialize)]
struct NodesResponse {
    nodes: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// API-level failures, rendered as JSON error bodies.
enum ApiError {
    UnknownNode(String),
    UnknownKind(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::UnknownNode(node_id) => (
                StatusCode::NOT_FOUND,
                format!("no snapshot for node {node_id:?}"),
            ),
            ApiError::UnknownKind(kind) => (
                StatusCode::NOT_FOUND,
                format!("unknown resource kind {kind:?}: expected clusters, routes, or listeners"),
            ),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(store: Arc<SnapshotStore>, config: &ServerConfig) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v3/discovery/nodes", get(list_nodes))
        .route("/v3/discovery/nodes/{node_id}", get(get_snapshot))
        .route("/v3/discovery/nodes/{node_id}/{kind}", get(get_resources))
        .with_state(AppState { store })
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
}

/// Serve the discovery API until the shutdown signal fires.
pub async fn serve(
    listener: TcpListener,
    store: Arc<SnapshotStore>,
    config: &ServerConfig,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "Discovery API starting");

    let app = build_router(store, config);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await?;

    tracing::info!("Discovery API stopped");
    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn list_nodes(State(state): State<AppState>) -> Json<NodesResponse> {
    Json(NodesResponse {
        nodes: state.store.node_ids(),
    })
}

async fn get_snapshot(
    State(state): State<AppState>,
    Path(node_id): Path<String>,
) -> Result<Json<Snapshot>, ApiError> {
    let snapshot = state
        .store
        .get(&node_id)
        .map_err(|_| ApiError::UnknownNode(node_id))?;
    Ok(Json((*snapshot).clone()))
}

async fn get_resources(
    State(state): State<AppState>,
    Path((node_id, kind)): Path<(String, String)>,
) -> Result<Json<DiscoveryResponse>, ApiError> {
    let type_url = match kind.as_str() {
        "clusters" => CLUSTER_TYPE_URL,
        "routes" => ROUTE_TYPE_URL,
        "listeners" => LISTENER_TYPE_URL,
        _ => return Err(ApiError::UnknownKind(kind)),
    };

    let snapshot = state
        .store
        .get(&node_id)
        .map_err(|_| ApiError::UnknownNode(node_id))?;

    let resources = if type_url == ROUTE_TYPE_URL {
        snapshot
            .route_configurations()
            .into_iter()
            .map(|table| Resource::RouteConfiguration(table.clone()))
            .collect()
    } else {
        snapshot.resources_of(type_url).to_vec()
    };

    Ok(Json(DiscoveryResponse {
        version_info: snapshot.version().to_string(),
        type_url: type_url.to_string(),
        resources,
    }))
}
