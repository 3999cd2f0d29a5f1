//! HTTP adapters - REST API implementations.

pub mod auth;

use std::time::Duration;

use axum::{http::StatusCode, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use auth::{auth_routes, AuthHandlers};

/// Full application router: auth endpoints under `/auth` plus a liveness probe.
///
/// Every request gets an `x-request-id` (generated when absent) that is echoed
/// on the response, and is answered with 408 once `request_timeout` elapses.
pub fn app_router(handlers: AuthHandlers, request_timeout: Duration) -> Router {
    Router::new()
        .nest("/auth", auth_routes(handlers))
        .route("/health", get(|| async { StatusCode::OK }))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TimeoutLayer::new(request_timeout)),
        )
}
