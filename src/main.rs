//! Relay server entry point

use assistant_relay::api::{create_router, AppState};
use assistant_relay::assistant::{LoggingAssistants, OpenAIAssistants};
use assistant_relay::config::{AssistantConfig, ServerConfig};
use assistant_relay::relay::Relay;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "assistant_relay=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let server_config = ServerConfig::from_env();
    let assistant_config = AssistantConfig::from_env();

    // Missing credentials are reported per request, not at startup
    if let Err(missing) = assistant_config.credentials() {
        tracing::warn!(
            "{missing}. Set OPENAI_API_KEY and OPENAI_ASSISTANT_ID; chat requests will fail."
        );
    }

    tracing::info!(
        base_url = %assistant_config.base_url,
        poll_interval_ms = %assistant_config.poll.interval.as_millis(),
        max_poll_attempts = assistant_config.poll.max_attempts,
        "Assistant client configured"
    );

    let api = Arc::new(LoggingAssistants::new(Arc::new(OpenAIAssistants::new(
        &assistant_config.base_url,
    ))));
    let state = AppState::new(Relay::new(assistant_config, api));

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(compression);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], server_config.port));
    tracing::info!("Assistant relay listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
