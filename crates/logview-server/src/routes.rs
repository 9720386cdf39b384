//! Route configuration for the query API.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerSettings;
use crate::handlers::{get_log_levels, get_logs, get_services, health_check};
use crate::state::AppState;

/// Create the query API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = build_cors_layer(&state.config().server);

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/logs", get(get_logs))
        // Discovery
        .route("/log-levels", get(get_log_levels))
        .route("/services", get(get_services));

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(settings: &ServerSettings) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if settings.cors_origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<_> = settings
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer.allow_origin(origins)
    }
}
