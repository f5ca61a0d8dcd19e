//! Front-end status API.
//!
//! Served on the front-end port and, when enabled, on the HTTP gateway port.
//!
//! | Route                          | Response                          |
//! |--------------------------------|-----------------------------------|
//! | `GET /health`                  | `{"status":"SERVING"}`            |
//! | `GET /api/v1/namespaces`       | enabled namespaces                |
//! | `GET /api/v1/namespaces/{ns}`  | one namespace, 404 if not enabled |
//! | `GET /api/v1/cluster-info`     | cluster id, version, persistence  |

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::pragma::PragmaMap;
use crate::server::error::Service;
use crate::server::layers;

/// Static facts about a constructed server.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ClusterInfo {
    pub cluster_id: String,
    pub server_version: &'static str,
    pub persistence: String,
    pub sqlite_pragmas: PragmaMap,
    pub namespaces: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct NamespaceView {
    pub name: String,
    pub state: &'static str,
}

#[derive(Debug, Serialize)]
pub struct NamespaceList {
    pub namespaces: Vec<NamespaceView>,
}

/// Build the front-end router for `service`.
pub fn router(service: Service, info: Arc<ClusterInfo>) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route("/api/v1/namespaces", get(list_namespaces))
        .route("/api/v1/namespaces/{name}", get(describe_namespace))
        .route("/api/v1/cluster-info", get(cluster_info))
        .with_state(info);

    layers::instrument(router, service)
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus { status: "SERVING" })
}

fn registered(name: &str) -> NamespaceView {
    NamespaceView {
        name: name.to_string(),
        state: "REGISTERED",
    }
}

async fn list_namespaces(State(info): State<Arc<ClusterInfo>>) -> Json<NamespaceList> {
    Json(NamespaceList {
        namespaces: info.namespaces.iter().map(|name| registered(name)).collect(),
    })
}

async fn describe_namespace(
    State(info): State<Arc<ClusterInfo>>,
    Path(name): Path<String>,
) -> Result<Json<NamespaceView>, StatusCode> {
    if info.namespaces.iter().any(|ns| *ns == name) {
        Ok(Json(registered(&name)))
    } else {
        tracing::debug!(namespace = %name, "Namespace not enabled");
        Err(StatusCode::NOT_FOUND)
    }
}

async fn cluster_info(State(info): State<Arc<ClusterInfo>>) -> Json<ClusterInfo> {
    Json(info.as_ref().clone())
}
