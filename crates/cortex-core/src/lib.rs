//! Cortex Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Storage backends
//! - Runtime specifics
//!
//! All types here represent the core business domain of the search-job
//! pipeline: jobs and their status, notifications, navigation decisions,
//! and recovery of structured results from raw model output.

pub mod decision;
pub mod error;
pub mod extract;
pub mod ids;
pub mod job;
pub mod notification;
pub mod status;

// Re-export commonly used types
pub use decision::{DelegateContext, Decision, ViewerArea};
pub use error::CoreError;
pub use extract::{extract, locate_candidate};
pub use ids::{JobId, NotificationId, UserId};
pub use job::{validate_query, SearchJob, MAX_QUERY_LEN};
pub use notification::{NewNotification, Notification, SEARCH_COMPLETED};
pub use status::JobStatus;
