use anyhow::{Context, anyhow};
use docsum::ai::Summarizer;
use docsum::api::{AppState, router};
use docsum::core::config::AppConfig;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    docsum::setup_logging();

    let config = AppConfig::from_env().map_err(|e| anyhow!("Config error: {e}"))?;
    let summarizer = Summarizer::from_config(&config)?;
    let addr = config.bind_address();
    let allowed_origins = config.allowed_origins.join(",");

    let app = router(AppState::new(config, summarizer));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, %allowed_origins, "Document summarization service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
