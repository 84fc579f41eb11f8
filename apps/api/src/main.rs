mod config;
mod criteria;
mod documents;
mod errors;
mod llm_client;
mod pipeline;
mod report;
mod routes;
mod scoring;
mod state;
mod text;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, ScorerBackend};
use crate::pipeline::Pipeline;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Fails fast on malformed or missing required env vars
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume ranker v{}", env!("CARGO_PKG_VERSION"));

    let pipeline = Pipeline::from_config(&config)?;
    match config.backend {
        ScorerBackend::Lexical => info!("Scoring backend: lexical"),
        ScorerBackend::Llm => info!(
            "Scoring backend: llm (model: {}, timeout: {}s)",
            llm_client::MODEL,
            config.llm_timeout_secs
        ),
    }
    info!(
        "Limits: {} resumes, {} criteria, {} bytes per upload; default report: {}",
        config.max_resumes,
        config.max_criteria,
        config.max_upload_bytes,
        config.report_format.file_name()
    );

    let state = AppState::new(config.clone(), pipeline);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
