//! OpenRouter-compatible HTTP client.

use async_trait::async_trait;
use tracing::{debug, error};

use crate::error::ModelError;
use crate::types::{Completion, CompletionRequest, Usage, WireRequest, WireResponse};
use crate::ModelClient;

/// Default provider endpoint.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default model name.
pub const DEFAULT_MODEL: &str = "anthropic/claude-sonnet-4-5";

/// Longest error body kept in [`ModelError::Api`].
const MAX_ERROR_BODY: usize = 300;

/// Connection settings for [`OpenRouterClient`].
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    /// API key sent as a bearer token.
    pub api_key: Option<String>,
    /// Base URL, without the `/chat/completions` suffix.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Public URL of the calling application (`HTTP-Referer`).
    pub referer: String,
    /// Application title (`X-Title`).
    pub title: String,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            referer: "http://localhost:3000".to_string(),
            title: "Nativz Cortex".to_string(),
        }
    }
}

/// HTTP client for an OpenAI-compatible chat completions endpoint.
pub struct OpenRouterClient {
    inner: reqwest::Client,
    api_key: String,
    url: String,
    model: String,
    referer: String,
    title: String,
}

impl OpenRouterClient {
    /// Create a new client. Fails if no API key is configured.
    pub fn new(config: OpenRouterConfig) -> Result<Self, ModelError> {
        let api_key = config
            .api_key
            .filter(|k| !k.is_empty())
            .ok_or(ModelError::NotConfigured("OPENROUTER_API_KEY"))?;

        Ok(Self {
            inner: reqwest::Client::new(),
            api_key,
            url: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model,
            referer: config.referer,
            title: config.title,
        })
    }

    /// Model identifier this client requests.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ModelClient for OpenRouterClient {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ModelError> {
        debug!(url = %self.url, model = %self.model, "POST chat completion");

        let body = WireRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            messages: &request.messages,
        };

        let response = self
            .inner
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body = truncate(&text, MAX_ERROR_BODY).to_string();
            error!(status = status.as_u16(), body = %body, "Model API error");
            return Err(ModelError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let data: WireResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Serialization(e.to_string()))?;

        let text = data
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default();

        if text.is_empty() {
            error!(model = %self.model, "Model returned no content");
            return Err(ModelError::EmptyResponse);
        }

        let usage = data
            .usage
            .map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(Completion { text, usage })
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
