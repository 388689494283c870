mod config;
mod errors;
mod evaluation;
mod extract;
mod jobs;
mod llm_client;
mod matching;
mod models;
mod parsing;
mod registry;
mod resumes;
mod retrieval;
mod routes;
mod scoring;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::registry::InMemoryRegistry;
use crate::retrieval::chunker::TextChunker;
use crate::retrieval::vector_store::InMemoryVectorIndex;
use crate::retrieval::RetrievalContextBuilder;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (errors on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS Evaluation API v{}", env!("CARGO_PKG_VERSION"));

    // Job/candidate registry: in-memory, empty at startup
    let registry = Arc::new(InMemoryRegistry::new());

    // Retrieval: in-process similarity index over resume chunks
    let retrieval = RetrievalContextBuilder::new(
        InMemoryVectorIndex::new(),
        TextChunker::new(config.chunk_size, config.chunk_overlap),
        config.top_k_chunks,
    );
    info!("Retrieval index initialized (top_k={})", config.top_k_chunks);

    // LLM client
    let llm = Arc::new(LlmClient::new(
        config.llm_api_key.clone(),
        config.llm_base_url.clone(),
        config.llm_model.clone(),
        config.retry.clone(),
    ));
    info!("LLM client initialized (model: {})", config.llm_model);

    // Build app state
    let state = AppState {
        registry,
        llm,
        retrieval,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
