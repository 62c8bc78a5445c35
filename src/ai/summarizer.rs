use std::sync::Arc;

use tracing::{info, warn};

use super::client::LlmClient;
use super::provider::SummaryProvider;
use super::stub::StubProvider;
use crate::core::config::{AppConfig, DEFAULT_MAX_INPUT_CHARS, ProviderKind};
use crate::core::models::SummarizeRequest;
use crate::errors::SummarizeError;
use crate::prompt::{sanitize_input, truncate_chars};

/// Generated text plus the name of the provider that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub text: String,
    pub provider: String,
}

/// Wraps the configured provider, with the stub as an optional fallback for
/// quota and timeout failures. Calls are never retried.
pub struct Summarizer {
    provider: Arc<dyn SummaryProvider>,
    fallback: Option<Arc<dyn SummaryProvider>>,
    max_input_chars: usize,
}

impl Summarizer {
    #[must_use]
    pub fn new(provider: Arc<dyn SummaryProvider>) -> Self {
        Self {
            provider,
            fallback: None,
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
        }
    }

    /// Builds the summarizer selected by configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, SummarizeError> {
        let provider: Arc<dyn SummaryProvider> = match config.provider_kind() {
            ProviderKind::Stub => Arc::new(StubProvider),
            ProviderKind::Groq => Arc::new(LlmClient::new("groq", &config.groq, config.temperature)?),
            ProviderKind::OpenAi => {
                Arc::new(LlmClient::new("openai", &config.openai, config.temperature)?)
            }
        };

        info!(
            provider = provider.name(),
            fallback_to_stub = config.fallback_to_stub,
            "Summarization provider selected"
        );

        let mut summarizer = Self::new(provider).with_max_input_chars(config.max_input_chars);
        if config.fallback_to_stub && config.provider_kind() != ProviderKind::Stub {
            summarizer = summarizer.with_fallback(Arc::new(StubProvider));
        }
        Ok(summarizer)
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: Arc<dyn SummaryProvider>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    #[must_use]
    pub fn with_max_input_chars(mut self, max_input_chars: usize) -> Self {
        self.max_input_chars = max_input_chars;
        self
    }

    #[must_use]
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// # Errors
    ///
    /// Propagates the provider error unless a fallback is configured and the
    /// failure was a quota or timeout.
    pub async fn summarize(&self, request: &SummarizeRequest) -> Result<Summary, SummarizeError> {
        let prepared = self.prepare(request);

        match self.provider.summarize(&prepared).await {
            Ok(text) => Ok(Summary {
                text,
                provider: self.provider.name().to_string(),
            }),
            Err(e) if e.is_transient_provider_failure() => {
                let Some(fallback) = &self.fallback else {
                    return Err(e);
                };
                warn!(
                    provider = self.provider.name(),
                    error = %e,
                    fallback = fallback.name(),
                    "Provider unavailable, answering with fallback"
                );
                let text = fallback.summarize(&prepared).await?;
                Ok(Summary {
                    text,
                    provider: fallback.name().to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }

    fn prepare(&self, request: &SummarizeRequest) -> SummarizeRequest {
        let sanitized = sanitize_input(&request.text);
        let truncated = truncate_chars(&sanitized, self.max_input_chars);
        if truncated.len() < sanitized.len() {
            info!(
                max_input_chars = self.max_input_chars,
                original_chars = sanitized.chars().count(),
                "Input too long, truncating before prompting"
            );
        }

        SummarizeRequest {
            text: truncated.trim().to_string(),
            style: request.style,
            max_tokens: request.max_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recording {
        seen: Mutex<Vec<String>>,
        outcome: fn() -> Result<String, SummarizeError>,
    }

    #[async_trait]
    impl SummaryProvider for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        async fn summarize(&self, request: &SummarizeRequest) -> Result<String, SummarizeError> {
            self.seen.lock().unwrap().push(request.text.clone());
            (self.outcome)()
        }
    }

    fn recording(outcome: fn() -> Result<String, SummarizeError>) -> Arc<Recording> {
        Arc::new(Recording {
            seen: Mutex::new(Vec::new()),
            outcome,
        })
    }

    #[tokio::test]
    async fn reports_the_answering_provider() {
        let provider = recording(|| Ok("done".to_string()));
        let summarizer = Summarizer::new(provider.clone());
        let request = SummarizeRequest::new("Some text here.", Some("brief"), None).unwrap();

        let summary = summarizer.summarize(&request).await.unwrap();
        assert_eq!(summary.text, "done");
        assert_eq!(summary.provider, "recording");
    }

    #[tokio::test]
    async fn truncates_and_sanitizes_before_calling_provider() {
        let provider = recording(|| Ok("ok".to_string()));
        let summarizer = Summarizer::new(provider.clone()).with_max_input_chars(5);
        let request = SummarizeRequest::new("ab\u{0007}cdefgh", None, None).unwrap();

        summarizer.summarize(&request).await.unwrap();
        assert_eq!(provider.seen.lock().unwrap().as_slice(), ["abcde"]);
    }

    #[tokio::test]
    async fn quota_errors_fall_back_when_enabled() {
        let provider = recording(|| Err(SummarizeError::ProviderQuota("429".to_string())));
        let summarizer = Summarizer::new(provider).with_fallback(Arc::new(StubProvider));
        let request = SummarizeRequest::new("First point. Second point.", None, None).unwrap();

        let summary = summarizer.summarize(&request).await.unwrap();
        assert_eq!(summary.provider, "stub");
        assert!(summary.text.starts_with("[STUB - brief]"));
    }

    #[tokio::test]
    async fn generic_errors_are_not_absorbed_by_fallback() {
        let provider = recording(|| Err(SummarizeError::Provider("bad request".to_string())));
        let summarizer = Summarizer::new(provider).with_fallback(Arc::new(StubProvider));
        let request = SummarizeRequest::new("Text.", None, None).unwrap();

        let err = summarizer.summarize(&request).await.unwrap_err();
        assert!(matches!(err, SummarizeError::Provider(_)));
    }

    #[tokio::test]
    async fn timeouts_surface_without_fallback() {
        let provider = recording(|| Err(SummarizeError::ProviderTimeout("slow".to_string())));
        let summarizer = Summarizer::new(provider);
        let request = SummarizeRequest::new("Text.", None, None).unwrap();

        let err = summarizer.summarize(&request).await.unwrap_err();
        assert!(matches!(err, SummarizeError::ProviderTimeout(_)));
    }
}
