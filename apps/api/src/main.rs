mod assistant;
mod config;
mod db;
mod errors;
mod extract;
mod llm_client;
mod marketplace;
mod matching;
mod models;
mod rag;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::llm_client::LlmClient;
use crate::matching::scoring::WeightedMatchScorer;
use crate::rag::embedder::{Embedder, HttpEmbedder};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting marketplace API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    if config.run_migrations {
        run_migrations(&db).await?;
    }

    // Initialize LLM client
    let llm = LlmClient::new(config.google_ai_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize embedder
    let embedder = HttpEmbedder::new(
        config.embedding_api_url.clone(),
        config.embedding_api_key.clone(),
        config.embedding_dimensions,
    )?;
    info!("Embedder initialized ({} dims)", embedder.dimensions());

    let state = AppState {
        db,
        llm,
        embedder: Arc::new(embedder),
        match_scorer: Arc::new(WeightedMatchScorer::default()),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}, serving frontend from {}", config.static_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
