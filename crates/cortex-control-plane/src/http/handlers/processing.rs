//! Processing page resolution for each viewer area.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use tracing::error;

use cortex_core::{Decision, JobId, ViewerArea};

use super::error_response;
use crate::http::responses::ErrorResponse;
use crate::state::AppState;

/// Processing page in the admin area.
pub async fn admin_processing_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    processing_page(&state, ViewerArea::Admin, JobId::new(id)).await
}

/// Processing page in the client portal.
pub async fn portal_processing_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    processing_page(&state, ViewerArea::Portal, JobId::new(id)).await
}

/// Redirect to finished results, or hand the polling view its context.
async fn processing_page(state: &AppState, area: ViewerArea, id: JobId) -> Response {
    match state.resolver().resolve(&id, area.prefix()).await {
        Ok(Decision::NotFound) => {
            error_response(StatusCode::NOT_FOUND, ErrorResponse::new("Search not found"))
        }
        Ok(Decision::Redirect(target)) => Redirect::to(&target).into_response(),
        Ok(Decision::Delegate(context)) => Json(context).into_response(),
        Err(e) => {
            error!(job_id = %id, error = %e, "Failed to resolve search status");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("Internal server error"),
            )
        }
    }
}
