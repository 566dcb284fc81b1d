//! Search job handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info};

use cortex_core::{validate_query, JobId, SearchJob};

use super::error_response;
use crate::http::responses::{
    CreateSearchRequest, CreateSearchResponse, ErrorResponse, ProcessResponse,
};
use crate::processor::{ProcessError, ProcessOutcome};
use crate::state::AppState;

/// Create a search job, ready for processing.
pub async fn create_search(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSearchRequest>,
) -> Response {
    let query = match validate_query(&req.query) {
        Ok(query) => query,
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_details("Validation failed", e.to_string()),
            )
        }
    };

    let job = SearchJob::new(query, req.created_by);
    let id = job.id.clone();

    if let Err(e) = state.jobs.insert_job(job).await {
        error!(error = %e, "Error creating search record");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::with_details("Failed to create search", e.to_string()),
        );
    }

    info!(job_id = %id, "Search created");
    Json(CreateSearchResponse { id }).into_response()
}

/// Fetch a search job.
pub async fn get_search(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    match state.jobs.get_job(&JobId::new(id)).await {
        Ok(Some(job)) => Json(job).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, ErrorResponse::new("Search not found")),
        Err(e) => {
            error!(error = %e, "Error fetching search");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("Internal server error"),
            )
        }
    }
}

/// Run the model pipeline for a processing search.
pub async fn process_search(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let Some(processor) = state.processor() else {
        error!("Processing requested but no model backend is configured");
        return error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorResponse::new("Model backend not configured"),
        );
    };

    match processor.process(&JobId::new(id)).await {
        Ok(ProcessOutcome::Completed | ProcessOutcome::AlreadyCompleted) => {
            Json(ProcessResponse { status: "completed" }).into_response()
        }
        Err(ProcessError::NotFound(_)) => {
            error_response(StatusCode::NOT_FOUND, ErrorResponse::new("Search not found"))
        }
        Err(ProcessError::NotProcessing(_)) => error_response(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("Search is not in processing state"),
        ),
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::with_details("Search failed", e.to_string()),
        ),
    }
}
