//! Job and notification storage.
//!
//! The pipeline only talks to storage through [`JobStore`] and
//! [`NotificationStore`]. The in-memory implementations back the server
//! binary and the tests.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use cortex_core::{
    JobId, JobStatus, NewNotification, Notification, NotificationId, SearchJob, UserId,
};

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A job with the same id already exists.
    #[error("Job already exists: {0}")]
    DuplicateJob(JobId),

    /// Update targeted a job that does not exist.
    #[error("Job not found: {0}")]
    MissingJob(JobId),

    /// Update targeted a job that already reached a terminal state.
    #[error("Job {id} is already {status}")]
    TerminalJob { id: JobId, status: JobStatus },

    /// Backend is unavailable or rejected the operation.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Read/write access to search jobs.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Fetch a job by id.
    async fn get_job(&self, id: &JobId) -> Result<Option<SearchJob>, StoreError>;

    /// Insert a new job.
    async fn insert_job(&self, job: SearchJob) -> Result<(), StoreError>;

    /// Replace a stored job.
    ///
    /// Fails with [`StoreError::TerminalJob`] once the stored job is completed
    /// or failed, so only one writer can finish a job.
    async fn update_job(&self, job: SearchJob) -> Result<(), StoreError>;

    /// Count jobs per status.
    async fn count_by_status(&self) -> Result<HashMap<JobStatus, u64>, StoreError>;
}

/// Privileged access to notifications.
///
/// Writes are not scoped to the calling user: the recipient of a
/// notification is usually not the actor that triggered it.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Store a new notification.
    async fn insert(&self, notification: NewNotification) -> Result<Notification, StoreError>;

    /// List a recipient's notifications, newest first.
    async fn list(
        &self,
        recipient: &UserId,
        limit: usize,
        unread_only: bool,
    ) -> Result<Vec<Notification>, StoreError>;

    /// Number of unread notifications for a recipient.
    async fn unread_count(&self, recipient: &UserId) -> Result<u64, StoreError>;

    /// Mark one of the recipient's notifications as read.
    ///
    /// Returns false if no such notification belongs to the recipient.
    async fn mark_read(&self, recipient: &UserId, id: &NotificationId)
        -> Result<bool, StoreError>;

    /// Mark all of the recipient's notifications as read, returning how many changed.
    async fn mark_all_read(&self, recipient: &UserId) -> Result<u64, StoreError>;

    /// Total number of unread notifications across all recipients.
    async fn total_unread(&self) -> Result<u64, StoreError>;
}

/// In-memory job store.
#[derive(Default)]
pub struct MemoryJobStore {
    jobs: RwLock<HashMap<JobId, SearchJob>>,
}

impl MemoryJobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn get_job(&self, id: &JobId) -> Result<Option<SearchJob>, StoreError> {
        Ok(self.jobs.read().await.get(id).cloned())
    }

    async fn insert_job(&self, job: SearchJob) -> Result<(), StoreError> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(StoreError::DuplicateJob(job.id));
        }
        jobs.insert(job.id.clone(), job);
        Ok(())
    }

    async fn update_job(&self, job: SearchJob) -> Result<(), StoreError> {
        let mut jobs = self.jobs.write().await;
        let stored = jobs
            .get_mut(&job.id)
            .ok_or_else(|| StoreError::MissingJob(job.id.clone()))?;

        if stored.status.is_terminal() {
            return Err(StoreError::TerminalJob {
                id: job.id,
                status: stored.status,
            });
        }

        *stored = job;
        Ok(())
    }

    async fn count_by_status(&self) -> Result<HashMap<JobStatus, u64>, StoreError> {
        let jobs = self.jobs.read().await;
        let mut counts: HashMap<JobStatus, u64> =
            JobStatus::ALL.iter().map(|s| (*s, 0)).collect();
        for job in jobs.values() {
            *counts.entry(job.status).or_default() += 1;
        }
        Ok(counts)
    }
}

/// In-memory notification store.
#[derive(Default)]
pub struct MemoryNotificationStore {
    notifications: RwLock<Vec<Notification>>,
}

impl MemoryNotificationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn insert(&self, notification: NewNotification) -> Result<Notification, StoreError> {
        let stored = Notification::from_new(notification);
        self.notifications.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn list(
        &self,
        recipient: &UserId,
        limit: usize,
        unread_only: bool,
    ) -> Result<Vec<Notification>, StoreError> {
        let notifications = self.notifications.read().await;
        // Insertion order is creation order, so newest are at the back.
        Ok(notifications
            .iter()
            .rev()
            .filter(|n| n.recipient() == recipient)
            .filter(|n| !unread_only || !n.is_read())
            .take(limit)
            .cloned()
            .collect())
    }

    async fn unread_count(&self, recipient: &UserId) -> Result<u64, StoreError> {
        let notifications = self.notifications.read().await;
        Ok(notifications
            .iter()
            .filter(|n| n.recipient() == recipient && !n.is_read())
            .count() as u64)
    }

    async fn mark_read(
        &self,
        recipient: &UserId,
        id: &NotificationId,
    ) -> Result<bool, StoreError> {
        let mut notifications = self.notifications.write().await;
        match notifications
            .iter_mut()
            .find(|n| &n.id == id && n.recipient() == recipient)
        {
            Some(n) => {
                n.content.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read(&self, recipient: &UserId) -> Result<u64, StoreError> {
        let mut notifications = self.notifications.write().await;
        let mut changed = 0;
        for n in notifications
            .iter_mut()
            .filter(|n| n.recipient() == recipient && !n.is_read())
        {
            n.content.is_read = true;
            changed += 1;
        }
        Ok(changed)
    }

    async fn total_unread(&self) -> Result<u64, StoreError> {
        let notifications = self.notifications.read().await;
        Ok(notifications.iter().filter(|n| !n.is_read()).count() as u64)
    }
}
