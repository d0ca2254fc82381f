use std::sync::Arc;
use tower_http::cors::CorsLayer;
use valo_coach_be::api;
use valo_coach_be::clients::{Backend, EngineConfig, LlmEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "valo_coach_be=debug,tower_http=info".into()),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Build the completion engine from the single optional credential
    let config = EngineConfig::from_env();
    if matches!(config.backend, Backend::Unconfigured) {
        tracing::warn!("GROQ_API_KEY not set; analysis endpoints will return a configuration error");
    }
    let engine = LlmEngine::new(config).map_err(|e| anyhow::anyhow!("{}", e))?;

    // Create app state
    let app_state = Arc::new(api::AppState::new(engine));

    // Create router with state
    let app = api::create_router()
        .layer(CorsLayer::permissive())
        .with_state(app_state.clone());

    // Start server
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    tracing::info!("Server listening on http://0.0.0.0:3000");

    axum::serve(listener, app).await?;

    Ok(())
}
