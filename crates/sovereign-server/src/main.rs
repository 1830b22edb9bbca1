//! Sovereign CFO desk HTTP server
//!
//! Axum-based server exposing the seven fund-operations panels as a REST
//! API and serving the WASM frontend.

mod config;
mod handlers;
mod state;


use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sovereign_agents::{FundDesk, SOVEREIGN_PERSONA};
use sovereign_core::{CompletionGateway, GatewayConfig, LlmProvider};
use sovereign_runtime::GroqProvider;

use crate::config::ServerConfig;
use crate::handlers::{
    clear_dataset, health_check, list_models, list_panels, run_panel, upload_dataset,
};
use crate::state::AppState;

/// API routes without static file serving
fn api_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health & info
        .route("/health", get(health_check))
        .route("/api/models", get(list_models))
        .route("/api/panels", get(list_panels))
        // Desk
        .route("/api/dataset", post(upload_dataset).delete(clear_dataset))
        .route("/api/panels/{slug}", post(run_panel))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    // Initialize completion provider
    let groq = GroqProvider::from_env();
    if !groq.has_api_key() {
        tracing::warn!("⚠ GROQ_API_KEY not set - every panel will answer with an error");
    }
    let provider: Arc<dyn LlmProvider> = Arc::new(groq);

    match provider.health_check().await {
        Ok(true) => tracing::info!("✓ Connected to Groq"),
        Ok(false) | Err(_) => tracing::warn!("⚠ Groq not reachable - panels will report errors"),
    }

    let gateway = CompletionGateway::new(
        provider.clone(),
        GatewayConfig::new(SOVEREIGN_PERSONA).with_default_model(&config.default_model),
    );
    let state = AppState::new(provider, FundDesk::with_gateway(gateway));

    let app = api_router(state).fallback_service(ServeDir::new(&config.static_dir));

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🧠 Sovereign AI desk running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("Default model: {}", config.default_model);
    tracing::info!("Endpoints:");
    tracing::info!("  GET    /health              - Health check");
    tracing::info!("  GET    /api/models          - List provider models");
    tracing::info!("  GET    /api/panels          - Panel catalogue");
    tracing::info!("  POST   /api/dataset         - Upload fund data (CSV)");
    tracing::info!("  DELETE /api/dataset         - Discard uploaded data");
    tracing::info!("  POST   /api/panels/{{slug}}   - Run a panel");

    axum::serve(listener, app).await?;

    Ok(())
}
