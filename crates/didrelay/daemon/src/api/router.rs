//! API Router configuration

use super::handlers;
use super::state::AppState;
use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the router for the HTTP surface.
///
/// Only `GET` is routed; other verbs get an empty 405.
pub fn create_router(state: AppState, enable_cors: bool) -> Router {
    let routes = Router::new()
        .route("/invitation", get(handlers::create_invitation))
        .route("/connections", get(handlers::list_connections))
        .route("/health", get(handlers::health_check));

    let routes = if enable_cors {
        routes.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        routes
    };

    routes.layer(TraceLayer::new_for_http()).with_state(state)
}
