//! Error types for the model client.

use thiserror::Error;

/// Errors that can occur when calling the model provider.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Client is missing required configuration.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// Transport-level HTTP error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status.
    #[error("Model API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Provider answered without any usable content.
    #[error("AI model returned an empty response. It may be overloaded. Try again.")]
    EmptyResponse,

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
