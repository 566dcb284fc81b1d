//! Navigation decisions for the search processing view.

use serde::{Deserialize, Serialize};

use crate::JobId;

/// Access area a viewer reaches search results through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerArea {
    /// Internal administrative area.
    Admin,
    /// Restricted client portal.
    Portal,
}

impl ViewerArea {
    /// Path prefix for this area.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Admin => "/admin",
            Self::Portal => "/portal",
        }
    }
}

/// Context handed to the polling view when a job is not yet complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegateContext {
    /// Job being polled.
    pub id: JobId,
    /// Original query text, shown while waiting.
    pub query: String,
    /// Prefix the polling view navigates under once the job completes.
    pub redirect_prefix: String,
}

/// Outcome of resolving a job's processing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// No job matches the identifier.
    NotFound,
    /// The job is complete; navigate to the given path.
    Redirect(String),
    /// The job is not complete; hand off to the polling view.
    Delegate(DelegateContext),
}

impl Decision {
    /// Path of the completed-result view for `id` under `prefix`.
    pub fn result_path(prefix: &str, id: &JobId) -> String {
        format!("{}/search/{}", prefix.trim_end_matches('/'), id)
    }

    /// Short name of the decision kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Redirect(_) => "redirect",
            Self::Delegate(_) => "delegate",
        }
    }
}
