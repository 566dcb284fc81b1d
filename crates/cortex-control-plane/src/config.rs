//! Control plane configuration.

use cortex_model_client::http::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use cortex_model_client::OpenRouterConfig;

/// Control plane configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server bind address.
    pub http_bind_addr: String,

    /// API key for the model provider.
    pub model_api_key: Option<String>,

    /// Model provider base URL.
    pub model_base_url: String,

    /// Model identifier.
    pub model_name: String,

    /// Token budget for a single search completion.
    pub max_tokens: u32,

    /// Public URL of this application, sent to the model provider.
    pub app_url: String,

    /// Application title, sent to the model provider.
    pub app_title: String,
}

impl Config {
    /// Settings for the model client.
    pub fn model_client_config(&self) -> OpenRouterConfig {
        OpenRouterConfig {
            api_key: self.model_api_key.clone(),
            base_url: self.model_base_url.clone(),
            model: self.model_name.clone(),
            referer: self.app_url.clone(),
            title: self.app_title.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_bind_addr: "[::1]:50052".to_string(),
            model_api_key: None,
            model_base_url: DEFAULT_BASE_URL.to_string(),
            model_name: DEFAULT_MODEL.to_string(),
            max_tokens: 16_000,
            app_url: "http://localhost:3000".to_string(),
            app_title: "Nativz Cortex".to_string(),
        }
    }
}
