//! `SneakerHub` storefront library.
//!
//! This crate provides the storefront as a library (catalog, cart store,
//! durable cart slot and HTTP router), allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod storage;

use axum::{Router, body::Body, middleware::from_fn, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};

use state::AppState;

/// Build the storefront router with its request middleware.
///
/// Sentry layers are added by the binary so tests can drive this router
/// without a Sentry client.
pub fn app(state: AppState) -> Router {
    let images = ServeDir::new(state.config().static_dir.join("img"));

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/img", images)
        .layer(from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(middleware::make_request_span::<Body>),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
