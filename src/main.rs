mod config;
mod db;
mod embedding;
mod errors;
mod extract;
mod ingest;
mod llm_client;
mod matching;
mod models;
mod roadmap;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::embedding::OpenAiEmbedder;
use crate::extract::PlainTextExtractor;
use crate::llm_client::LlmClient;
use crate::roadmap::catalog::Catalog;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::VectorStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobfit API v{}", env!("CARGO_PKG_VERSION"));

    // PostgreSQL + pgvector
    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    let store = VectorStore::new(pool);

    // Resource catalog — read-only process state
    let catalog = Arc::new(Catalog::load()?);
    info!("Catalog loaded: {} resources", catalog.resource_count());

    // Outbound clients
    let llm = LlmClient::new(config.openai_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);
    let embedder = Arc::new(OpenAiEmbedder::new(config.openai_api_key.clone()));
    info!(
        "Embedder initialized (model: {})",
        embedding::EMBEDDING_MODEL
    );

    let state = AppState {
        store,
        llm,
        embedder,
        extractor: Arc::new(PlainTextExtractor),
        catalog,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the CORS layer from the configured allow-list; an empty list
/// means permissive (local development).
fn cors_layer(config: &Config) -> CorsLayer {
    if config.allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}
