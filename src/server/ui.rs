//! Embedded UI sub-service.
//!
//! Hosts the UI's settings and health endpoints next to the front-end. The
//! UI assets themselves are not bundled; `/` only answers when the UI is
//! enabled and points at the upstream front-end.

use std::sync::Arc;

use axum::{
    extract::State,
    response::Html,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::server::error::Service;
use crate::server::layers;
use crate::server::options::UiConfig;

#[derive(Debug, Serialize)]
struct UiSettingsView {
    upstream_address: String,
    enable_ui: bool,
    enable_openapi: bool,
    version: &'static str,
}

/// Build the UI router from its construction config.
pub fn router(config: UiConfig) -> Router {
    let mut router = Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({ "status": "SERVING" })) }))
        .route("/api/v1/settings", get(settings));
    if config.enable_ui {
        router = router.route("/", get(index));
    }

    layers::instrument(router.with_state(Arc::new(config)), Service::Ui)
}

async fn settings(State(config): State<Arc<UiConfig>>) -> Json<UiSettingsView> {
    Json(UiSettingsView {
        upstream_address: config.upstream_address.clone(),
        enable_ui: config.enable_ui,
        enable_openapi: config.enable_openapi,
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn index(State(config): State<Arc<UiConfig>>) -> Html<String> {
    Html(format!(
        "<!doctype html><html><head><title>workflow-devserver</title></head>\
         <body><p>Front-end: {}</p><p><a href=\"/api/v1/settings\">settings</a></p></body></html>",
        config.upstream_address
    ))
}
