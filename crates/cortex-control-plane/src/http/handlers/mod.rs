//! HTTP request handlers.

mod health;
mod notifications;
mod processing;
mod search;

pub use health::{health_check, metrics_handler};
pub use notifications::{list_notifications, mark_notifications_read};
pub use processing::{admin_processing_page, portal_processing_page};
pub use search::{create_search, get_search, process_search};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::http::responses::ErrorResponse;

/// JSON error response with the given status.
fn error_response(status: StatusCode, error: ErrorResponse) -> Response {
    (status, Json(error)).into_response()
}
