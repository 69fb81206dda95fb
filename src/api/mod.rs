//! HTTP API consumed by the map client.

mod handlers;

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::services::GatewayService;

pub use handlers::{BusesParams, StopsParams};

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Create the application router with all endpoints
pub fn create_app(gateway: GatewayService) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/buses", get(handlers::get_buses))
        .route("/api/lines", get(handlers::get_lines))
        .route("/api/stops", get(handlers::get_stops))
        .route("/api/status", get(handlers::get_status))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(gateway)
}
