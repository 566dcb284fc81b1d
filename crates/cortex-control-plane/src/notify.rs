//! Best-effort notification dispatch.

use std::sync::Arc;

use tracing::{debug, error};

use cortex_core::{NewNotification, UserId};

use crate::store::NotificationStore;

/// Writes notifications for recipients as a side channel of the pipeline.
///
/// Delivery is at most once: a single insert attempt, no retry and no
/// deduplication. Failures are logged and never reach the caller.
#[derive(Clone)]
pub struct NotificationDispatcher {
    store: Arc<dyn NotificationStore>,
}

impl NotificationDispatcher {
    /// Create a dispatcher over a privileged notification store.
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// Build an unread notification and submit it.
    ///
    /// An empty body or link path is stored as absent.
    pub async fn dispatch(
        &self,
        recipient: UserId,
        kind: &str,
        title: &str,
        body: Option<&str>,
        link_path: Option<&str>,
    ) {
        let mut notification = NewNotification::new(recipient, kind, title);
        notification.body = body.filter(|s| !s.is_empty()).map(str::to_owned);
        notification.link_path = link_path.filter(|s| !s.is_empty()).map(str::to_owned);
        self.send(notification).await;
    }

    /// Submit a prepared notification.
    pub async fn send(&self, notification: NewNotification) {
        let recipient = notification.recipient_user_id.clone();
        let kind = notification.kind.clone();

        match self.store.insert(notification).await {
            Ok(stored) => {
                debug!(
                    notification_id = %stored.id,
                    recipient = %recipient,
                    kind = %kind,
                    "Notification created"
                );
            }
            Err(e) => {
                error!(
                    recipient = %recipient,
                    kind = %kind,
                    error = %e,
                    "Failed to create notification"
                );
            }
        }
    }
}
