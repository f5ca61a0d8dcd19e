//! Middleware shared by every HTTP surface the server exposes.
//!
//! - `x-request-id` generated (UUID v4) and echoed on the response
//! - request/response tracing spans
//! - per-route request metrics

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::{self, Next},
    response::Response,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::observability::metrics;
use crate::server::error::Service;

/// Wrap a fully-routed, stateless router with the common layers.
pub fn instrument(router: Router, service: Service) -> Router {
    router
        .route_layer(middleware::from_fn_with_state(service, track_metrics))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}

async fn track_metrics(State(service): State<Service>, request: Request, next: Next) -> Response {
    let start = Instant::now();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let response = next.run(request).await;
    metrics::record_request(service.as_str(), &route, response.status().as_u16(), start);
    response
}
