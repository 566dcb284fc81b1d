//! Notification feed handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use cortex_core::UserId;

use super::error_response;
use crate::http::responses::{
    ErrorResponse, MarkReadRequest, NotificationFeedResponse, NotificationQuery, SuccessResponse,
};
use crate::state::AppState;

const DEFAULT_FEED_LIMIT: usize = 20;

/// List a user's notifications, newest first, with their unread count.
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(params): Query<NotificationQuery>,
) -> Response {
    let recipient = UserId::new(user_id);
    let limit = params
        .limit
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_FEED_LIMIT);
    let unread_only = params.unread.unwrap_or(false);

    let feed = async {
        let notifications = state
            .notifications
            .list(&recipient, limit, unread_only)
            .await?;
        let unread_count = state.notifications.unread_count(&recipient).await?;
        Ok::<_, crate::store::StoreError>(NotificationFeedResponse {
            notifications,
            unread_count,
        })
    };

    match feed.await {
        Ok(feed) => Json(feed).into_response(),
        Err(e) => {
            error!(recipient = %recipient, error = %e, "Error fetching notifications");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("Failed to fetch notifications"),
            )
        }
    }
}

/// Mark one or all of a user's notifications read.
pub async fn mark_notifications_read(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(req): Json<MarkReadRequest>,
) -> Response {
    let recipient = UserId::new(user_id);

    let result = if req.mark_all_read {
        state.notifications.mark_all_read(&recipient).await.map(|_| ())
    } else if let Some(id) = req.id {
        state
            .notifications
            .mark_read(&recipient, &id)
            .await
            .map(|_| ())
    } else {
        return error_response(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("Provide id or mark_all_read"),
        );
    };

    match result {
        Ok(()) => Json(SuccessResponse { success: true }).into_response(),
        Err(e) => {
            error!(recipient = %recipient, error = %e, "Error updating notifications");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("Internal server error"),
            )
        }
    }
}
