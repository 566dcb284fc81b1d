//! User notification records.

use crate::ids::{JobId, NotificationId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Type tag for the notification sent when a search job finishes.
pub const SEARCH_COMPLETED: &str = "search_completed";

/// A notification as submitted for storage.
///
/// Built once per triggering event and handed to the notification store;
/// the store assigns the id and creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNotification {
    /// User the notification is addressed to.
    pub recipient_user_id: UserId,
    /// Free-form type tag (e.g. `search_completed`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Short headline.
    pub title: String,
    /// Optional longer text.
    pub body: Option<String>,
    /// Optional in-app path the notification links to.
    pub link_path: Option<String>,
    /// Read flag. Always false for new notifications.
    pub is_read: bool,
}

impl NewNotification {
    /// Create an unread notification.
    pub fn new(recipient: UserId, kind: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            recipient_user_id: recipient,
            kind: kind.into(),
            title: title.into(),
            body: None,
            link_path: None,
            is_read: false,
        }
    }

    /// Builder method to set the body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Builder method to set the link path.
    pub fn with_link_path(mut self, link_path: impl Into<String>) -> Self {
        self.link_path = Some(link_path.into());
        self
    }

    /// Notification telling `recipient` their search results are ready.
    pub fn search_completed(recipient: UserId, job_id: &JobId, query: &str) -> Self {
        Self::new(recipient, SEARCH_COMPLETED, "Search completed")
            .with_body(format!("Results ready for \"{query}\""))
            .with_link_path(format!("/admin/search/{job_id}"))
    }
}

/// A stored notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// When the notification was stored.
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub content: NewNotification,
}

impl Notification {
    /// Assign storage identity to a new notification.
    pub fn from_new(content: NewNotification) -> Self {
        Self {
            id: NotificationId::generate(),
            created_at: Utc::now(),
            content,
        }
    }

    /// Recipient of this notification.
    pub fn recipient(&self) -> &UserId {
        &self.content.recipient_user_id
    }

    /// Whether the recipient has read this notification.
    pub fn is_read(&self) -> bool {
        self.content.is_read
    }
}
