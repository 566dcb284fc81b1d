//! Core domain errors.

use thiserror::Error;

use crate::JobStatus;

/// Core domain errors for Cortex.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Job not found.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Invalid state transition.
    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: JobStatus, to: JobStatus },

    /// Invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model output could not be decoded into the requested type.
    ///
    /// `candidate` is the exact text handed to the decoder, after fence
    /// stripping, kept for diagnostics.
    #[error("Failed to parse model output as JSON ({reason}); candidate starts with: {:?}", preview(.candidate))]
    MalformedOutput { candidate: String, reason: String },
}

impl CoreError {
    /// Returns true if this is a malformed model output error.
    pub fn is_malformed_output(&self) -> bool {
        matches!(self, Self::MalformedOutput { .. })
    }
}

fn preview(candidate: &str) -> &str {
    match candidate.char_indices().nth(200) {
        Some((idx, _)) => &candidate[..idx],
        None => candidate,
    }
}
