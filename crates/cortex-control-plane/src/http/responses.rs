//! HTTP request and response types.

use serde::{Deserialize, Serialize};

use cortex_core::{JobId, Notification, NotificationId, UserId};

// ============================================================================
// Search types
// ============================================================================

/// Request body for creating a search.
#[derive(Debug, Deserialize)]
pub struct CreateSearchRequest {
    /// Query text.
    pub query: String,

    /// User creating the search.
    pub created_by: UserId,
}

/// Response body for a created search.
#[derive(Debug, Serialize)]
pub struct CreateSearchResponse {
    pub id: JobId,
}

/// Response body for a processing request.
#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub status: &'static str,
}

// ============================================================================
// Notification types
// ============================================================================

/// Query parameters for the notification feed.
#[derive(Debug, Default, Deserialize)]
pub struct NotificationQuery {
    /// Maximum number of notifications to return.
    pub limit: Option<usize>,

    /// Only return unread notifications.
    pub unread: Option<bool>,
}

/// Notification feed response.
#[derive(Debug, Serialize)]
pub struct NotificationFeedResponse {
    pub notifications: Vec<Notification>,
    pub unread_count: u64,
}

/// Request body for marking notifications read.
#[derive(Debug, Deserialize)]
pub struct MarkReadRequest {
    /// Single notification to mark read.
    pub id: Option<NotificationId>,

    /// Mark every notification read.
    #[serde(default)]
    pub mark_all_read: bool,
}

/// Generic success response.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

// ============================================================================
// Error types
// ============================================================================

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Error without details.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    /// Error with details.
    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}
