pub mod api;
pub mod config;
pub mod inference;
pub mod story;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use api::AppState;

/// Full HTTP surface with CORS and request tracing attached.
pub fn build_router(state: AppState) -> Router {
    api::router()
        .layer(TraceLayer::new_for_http())
        // CORS for frontend
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}
