use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use transcript_screener::config::Config;
use transcript_screener::engine::{Engine, EngineConfig};
use transcript_screener::server;
use transcript_screener::upstream::HttpTranscriptSource;
use transcript_screener::vocabulary::Vocabulary;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("transcript_screener=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;

    // A missing word list is fatal: nothing can be screened without it
    info!("Loading flagged words from {}", config.wordlist_path);
    let vocabulary = Vocabulary::load(&config.wordlist_path)?;
    if vocabulary.is_empty() {
        warn!("Word list {} is empty; nothing will be flagged", config.wordlist_path);
    }
    info!("Loaded {} flagged words", vocabulary.len());

    let source = HttpTranscriptSource::new(&config.upstream_base_url, config.upstream_timeout)?;

    info!("Starting worker pool...");
    let engine = Arc::new(Engine::start(
        EngineConfig::from(&config),
        Arc::new(source),
        Arc::new(vocabulary),
    ));

    let app = server::router(Arc::clone(&engine));
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server is running on port {}", config.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Shutting down, draining queued jobs");
    engine.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
