//! Cortex Control Plane Server

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cortex_control_plane::http::create_router;
use cortex_control_plane::{AppState, Config};
use cortex_model_client::{ModelClient, OpenRouterClient};

/// Cortex control plane server.
#[derive(Parser, Debug)]
#[command(name = "cortex-control-plane", about = "Cortex search job control plane")]
struct Args {
    /// HTTP server address
    #[arg(long, env = "CORTEX_HTTP_ADDR", default_value = "[::1]:50052")]
    http_addr: String,

    /// API key for the model provider
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model identifier
    #[arg(long, env = "OPENROUTER_MODEL")]
    model: Option<String>,

    /// Model provider base URL
    #[arg(long, env = "OPENROUTER_BASE_URL")]
    model_base_url: Option<String>,

    /// Public URL of this application
    #[arg(long, env = "CORTEX_APP_URL")]
    app_url: Option<String>,

    /// Token budget for a single search completion
    #[arg(long, default_value = "16000")]
    max_tokens: u32,
}

impl Args {
    fn into_config(self) -> Config {
        let defaults = Config::default();
        Config {
            http_bind_addr: self.http_addr,
            model_api_key: self.api_key,
            model_base_url: self.model_base_url.unwrap_or(defaults.model_base_url),
            model_name: self.model.unwrap_or(defaults.model_name),
            max_tokens: self.max_tokens,
            app_url: self.app_url.unwrap_or(defaults.app_url),
            app_title: defaults.app_title,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cortex=info,tower_http=info")),
        )
        .with_target(true)
        .init();

    // Load config
    let config = Args::parse().into_config();
    let http_addr: SocketAddr = config.http_bind_addr.parse()?;

    // Model backend is optional - processing is disabled without it
    let model: Option<Arc<dyn ModelClient>> =
        match OpenRouterClient::new(config.model_client_config()) {
            Ok(client) => {
                info!(model = %client.model(), "Model backend configured");
                Some(Arc::new(client))
            }
            Err(e) => {
                warn!(error = %e, "Model backend unavailable - search processing disabled");
                None
            }
        };

    let state = AppState::new(config, model);
    let router = create_router(state);

    let listener = TcpListener::bind(http_addr).await?;
    info!(http_addr = %http_addr, "Starting Cortex control plane");

    axum::serve(listener, router).await?;

    Ok(())
}
