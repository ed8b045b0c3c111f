mod comparison;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod normalizer;
mod reader;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::comparison::MissionComparer;
use crate::config::Config;
use crate::extraction::DossierExtractor;
use crate::llm_client::retry::{RetryPolicy, MAX_ATTEMPTS};
use crate::llm_client::{CompletionService, LlmClient};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Dossier API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm: Arc<dyn CompletionService> = Arc::new(LlmClient::new(
        config.anthropic_api_key.clone(),
        config.llm_timeout,
    )?);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let retry = RetryPolicy {
        max_attempts: MAX_ATTEMPTS,
        base_delay: config.retry_base_delay,
        max_delay: config.retry_max_delay,
        attempt_timeout: config.llm_timeout,
    };
    info!(
        "Retry policy: {} attempts, backoff {:?}..{:?}, {:?} per attempt",
        retry.max_attempts, retry.base_delay, retry.max_delay, retry.attempt_timeout
    );

    // Build app state
    let state = AppState {
        extractor: Arc::new(DossierExtractor::new(llm.clone(), retry.clone())),
        comparer: Arc::new(MissionComparer::new(llm, retry)),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict allowed origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
