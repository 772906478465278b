//! Seismogram API Service Library
//!
//! This crate provides the HTTP server serving synthetic seismograms from a
//! precomputed database. Request validation lives in `seismo-protocol`;
//! this crate wires it to axum, streams extraction output and exports
//! metrics.

pub mod config;
pub mod extent;
pub mod extraction;
pub mod handlers;
pub mod metrics;
pub mod state;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue},
    middleware::map_response,
    response::Response,
    routing::get,
    Extension, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Value of the `Server` header on every response.
pub const SERVER_HEADER: &str = concat!("SeismoServer/", env!("CARGO_PKG_VERSION"));

async fn add_server_header(mut response: Response) -> Response {
    response
        .headers_mut()
        .insert(header::SERVER, HeaderValue::from_static(SERVER_HEADER));
    response
}

/// Build the application router.
pub fn router(state: Arc<AppState>, prometheus: PrometheusHandle) -> Router {
    Router::new()
        .route("/", get(handlers::landing::root_handler))
        .route("/info", get(handlers::landing::info_handler))
        .route(
            "/seismograms",
            get(handlers::seismograms::seismograms_handler),
        )
        .route("/ttime", get(handlers::traveltime::ttime_handler))
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        // Middleware
        .layer(Extension(state))
        .layer(Extension(prometheus))
        .layer(map_response(add_server_header))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
