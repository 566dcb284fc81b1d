//! HTTP server for the control plane.
//!
//! Provides endpoints for:
//! - Search jobs (`/v1/search`, `/v1/search/:id`, `/v1/search/:id/process`)
//! - Processing pages (`/admin/search/:id/processing`, `/portal/search/:id/processing`)
//! - Notification feed (`/v1/users/:user_id/notifications`)
//! - Health check (`/health`)
//! - Prometheus metrics (`/metrics`)

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

mod handlers;
pub mod responses;

/// Create the HTTP router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Search API
        .route("/v1/search", post(handlers::create_search))
        .route("/v1/search/:id", get(handlers::get_search))
        .route("/v1/search/:id/process", post(handlers::process_search))
        // Processing pages
        .route(
            "/admin/search/:id/processing",
            get(handlers::admin_processing_page),
        )
        .route(
            "/portal/search/:id/processing",
            get(handlers::portal_processing_page),
        )
        // Notifications
        .route(
            "/v1/users/:user_id/notifications",
            get(handlers::list_notifications).patch(handlers::mark_notifications_read),
        )
        // Observability routes
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
