//! Status enum for search jobs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a search job.
///
/// Transitions are monotonic: once a job is `Completed` or `Failed` it never
/// moves again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job recorded but not yet handed to a processor.
    #[default]
    Pending,
    /// Job is being processed by the model pipeline.
    Processing,
    /// Job finished and its result is available.
    Completed,
    /// Job failed.
    Failed,
}

impl JobStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [JobStatus; 4] = [
        JobStatus::Pending,
        JobStatus::Processing,
        JobStatus::Completed,
        JobStatus::Failed,
    ];

    /// Returns true if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        match self {
            Self::Completed | Self::Failed => true,
            Self::Pending | Self::Processing => false,
        }
    }

    /// Returns true if a job may move from `self` to `next`.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        match (self, next) {
            (Self::Completed | Self::Failed, _) => false,
            (Self::Pending, Self::Pending) => false,
            (Self::Pending, _) => true,
            (Self::Processing, Self::Pending | Self::Processing) => false,
            (Self::Processing, Self::Completed | Self::Failed) => true,
        }
    }

    /// Wire name, as stored and serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
