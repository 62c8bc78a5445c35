/// docsum - a small web service that summarizes text and uploaded documents with an LLM.
///
/// A single endpoint, `POST /api/summarize`, accepts either JSON text or a
/// multipart file upload, extracts plain text from the document when needed,
/// and asks a hosted chat-completions model for a summary in the requested
/// style.
///
/// # Architecture
///
/// The system uses:
/// - axum for the HTTP surface, with tower-http for CORS and request tracing
/// - format-specific extractors (pdf-extract, zip + quick-xml, csv, html2text)
/// - reqwest against an OpenAI-compatible API (OpenAI or Groq), or a local stub
/// - Tokio for the async runtime
///
/// # Example
///
/// ```no_run
/// use docsum::ai::Summarizer;
/// use docsum::api::{AppState, router};
/// use docsum::core::config::AppConfig;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     docsum::setup_logging();
///
///     let config = AppConfig::from_env()?;
///     let summarizer = Summarizer::from_config(&config)?;
///     let addr = config.bind_address();
///
///     let app = router(AppState::new(config, summarizer));
///     let listener = tokio::net::TcpListener::bind(addr).await?;
///     axum::serve(listener, app).await?;
///     Ok(())
/// }
/// ```
// Module declarations
pub mod ai;
pub mod api;
pub mod core;
pub mod errors;
pub mod extract;
pub mod prompt;

pub use errors::SummarizeError;

/// Configure structured JSON logging, filtered by `RUST_LOG` (default `info`).
///
/// Safe to call more than once; later calls leave the first subscriber in place.
///
/// # Example
///
/// ```
/// docsum::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
