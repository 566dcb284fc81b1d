//! Chat-completion client for Cortex.
//!
//! Provides the [`ModelClient`] seam used by the search processor and an
//! OpenRouter-compatible HTTP implementation.

pub mod error;
pub mod http;
pub mod types;

pub use error::ModelError;
pub use http::{OpenRouterClient, OpenRouterConfig};
pub use types::{ChatMessage, ChatRole, Completion, CompletionRequest, Usage};

use async_trait::async_trait;

/// A backend able to run a chat completion.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Run a completion and return the raw model text.
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ModelError>;
}
