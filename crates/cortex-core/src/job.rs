//! Search job type.

use crate::{CoreError, JobId, JobStatus, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum accepted length of a search query, in characters.
pub const MAX_QUERY_LEN: usize = 500;

/// A SearchJob is a unit of asynchronous AI-driven processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchJob {
    /// Unique job identifier.
    pub id: JobId,

    /// User-supplied query text.
    pub query: String,

    /// Current job status.
    pub status: JobStatus,

    /// Who created this job.
    pub created_by: UserId,

    /// When the job was created.
    pub created_at: DateTime<Utc>,

    /// When the job reached a terminal state.
    pub completed_at: Option<DateTime<Utc>>,

    /// Short human-readable outcome (report summary or failure message).
    pub summary: Option<String>,

    /// Raw model text recorded when processing finished.
    pub raw_output: Option<String>,

    /// Structured result recovered from the raw output.
    pub result: Option<serde_json::Value>,

    /// Tokens consumed by the model call.
    pub tokens_used: Option<u32>,

    /// Estimated model cost in USD.
    pub estimated_cost: Option<f64>,
}

impl SearchJob {
    /// Create a new job, ready for processing.
    pub fn new(query: impl Into<String>, created_by: UserId) -> Self {
        Self {
            id: JobId::generate(),
            query: query.into(),
            status: JobStatus::Processing,
            created_by,
            created_at: Utc::now(),
            completed_at: None,
            summary: None,
            raw_output: None,
            result: None,
            tokens_used: None,
            estimated_cost: None,
        }
    }

    /// Builder method to set a specific ID (useful for testing).
    pub fn with_id(mut self, id: JobId) -> Self {
        self.id = id;
        self
    }

    /// Builder method to set the initial status (useful for testing).
    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = status;
        self
    }

    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Move the job to `next`, rejecting any non-forward transition.
    fn transition(&mut self, next: JobStatus) -> Result<(), CoreError> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::InvalidStateTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        if next.is_terminal() {
            self.completed_at = Some(Utc::now());
        }
        Ok(())
    }

    /// Mark a pending job as processing.
    pub fn start(&mut self) -> Result<(), CoreError> {
        self.transition(JobStatus::Processing)
    }

    /// Mark the job as completed with its recovered result.
    pub fn complete(
        &mut self,
        raw_output: impl Into<String>,
        result: serde_json::Value,
        summary: Option<String>,
    ) -> Result<(), CoreError> {
        self.transition(JobStatus::Completed)?;
        self.raw_output = Some(raw_output.into());
        self.result = Some(result);
        self.summary = summary;
        Ok(())
    }

    /// Mark the job as failed.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), CoreError> {
        self.transition(JobStatus::Failed)?;
        self.summary = Some(message.into());
        Ok(())
    }
}

/// Validate a user-supplied query, returning it trimmed.
pub fn validate_query(query: &str) -> Result<&str, CoreError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidInput("Search query is required".into()));
    }
    if trimmed.chars().count() > MAX_QUERY_LEN {
        return Err(CoreError::InvalidInput(format!(
            "Search query must be at most {MAX_QUERY_LEN} characters"
        )));
    }
    Ok(trimmed)
}
