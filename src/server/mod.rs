//! HTTP layer
//!
//! Thin axum adapter around the prediction service: routing, request
//! tracing and the JSON response envelope.

pub mod browser;
pub mod routes;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::{prepare_state, AppState, ServerConfig, SharedState};

/// Build the application router
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        // Presentation page
        .route("/", get(routes::home::home))
        // Health check
        .route("/health", get(routes::health::health_check))
        // Prediction
        .route("/predecir", post(routes::predict::make_prediction))
        // Add state
        .with_state(state)
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
