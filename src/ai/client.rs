//! OpenAI-compatible chat completions client.
//!
//! Both OpenAI and Groq expose the same `/chat/completions` surface, so one
//! client serves either provider; only the base URL, key, model and timeout
//! differ.

use async_trait::async_trait;
use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tracing::{info, warn};

use super::provider::SummaryProvider;
use crate::core::config::ProviderSettings;
use crate::core::models::{Style, SummarizeRequest};
use crate::errors::SummarizeError;
use crate::prompt::{SYSTEM_PROMPT, build_prompt, estimate_tokens};

const ERROR_EXCERPT_CHARS: usize = 500;

/// LLM API client for generating summaries
pub struct LlmClient {
    name: String,
    api_key: Option<String>,
    model_name: String,
    endpoint: String,
    temperature: f32,
    http: Client,
}

impl LlmClient {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        name: &str,
        settings: &ProviderSettings,
        temperature: f32,
    ) -> Result<Self, SummarizeError> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| {
                SummarizeError::HttpError(format!("Failed to build {name} HTTP client: {e}"))
            })?;

        Ok(Self {
            name: name.to_string(),
            api_key: settings.api_key.clone(),
            model_name: settings.model.clone(),
            endpoint: format!(
                "{}/chat/completions",
                settings.api_base.as_str().trim_end_matches('/')
            ),
            temperature,
            http,
        })
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn build_prompt(&self, style: Style, text: &str) -> Vec<ChatCompletionMessage> {
        vec![
            ChatCompletionMessage {
                role: MessageRole::system,
                content: Content::Text(SYSTEM_PROMPT.to_string()),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
            ChatCompletionMessage {
                role: MessageRole::user,
                content: Content::Text(build_prompt(style, text)),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
        ]
    }

    /// # Errors
    ///
    /// Returns `NotConfigured` without an API key, `ProviderTimeout` or
    /// `ProviderQuota` for the matching upstream failures, and `Provider` for
    /// any other non-success status or an unusable response body.
    pub async fn generate_summary(
        &self,
        prompt: Vec<ChatCompletionMessage>,
        max_tokens: Option<u32>,
    ) -> Result<String, SummarizeError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(SummarizeError::NotConfigured(format!(
                "no API key set for provider '{}'",
                self.name
            )));
        };

        #[cfg(feature = "debug-logs")]
        info!("Using {} prompt:\n{:?}", self.name, prompt);

        let estimated_input_tokens = prompt
            .iter()
            .map(|msg| estimate_tokens(&format!("{:?}", msg.content)))
            .sum::<usize>();

        info!(
            provider = %self.name,
            model = %self.model_name,
            estimated_input_tokens,
            "Requesting summary"
        );

        let mut request_body = json!({
            "model": self.model_name,
            "messages": build_chat_messages(&prompt),
            "temperature": self.temperature,
        });
        if let Some(limit) = max_tokens {
            request_body["max_tokens"] = json!(limit);
        }

        let mut headers = reqwest::header::HeaderMap::new();
        let auth_value = format!("Bearer {api_key}")
            .parse()
            .map_err(|e| SummarizeError::HttpError(format!("Invalid Authorization header: {e}")))?;
        headers.insert(reqwest::header::AUTHORIZATION, auth_value);

        let response = self
            .http
            .post(&self.endpoint)
            .headers(headers)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SummarizeError::ProviderTimeout(format!("{} request timed out: {e}", self.name))
                } else {
                    SummarizeError::HttpError(format!("{} API request failed: {e}", self.name))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            let error = classify_failure(&self.name, status, &error_text);
            warn!(provider = %self.name, %status, error = %error, "Provider call failed");
            return Err(error);
        }

        let response_json: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                SummarizeError::ProviderTimeout(format!("{} response timed out: {e}", self.name))
            } else {
                SummarizeError::Provider(format!("Failed to parse {} response: {e}", self.name))
            }
        })?;

        extract_completion_text(&response_json).ok_or_else(|| {
            SummarizeError::Provider(format!("{} returned no summary text", self.name))
        })
    }
}

#[async_trait]
impl SummaryProvider for LlmClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn summarize(&self, request: &SummarizeRequest) -> Result<String, SummarizeError> {
        let prompt = self.build_prompt(request.style, &request.text);
        self.generate_summary(prompt, request.max_tokens).await
    }
}

/// Maps a non-success provider response onto an error kind.
#[must_use]
pub fn classify_failure(provider: &str, status: StatusCode, body: &str) -> SummarizeError {
    let lowered = body.to_ascii_lowercase();
    let excerpt: String = body.chars().take(ERROR_EXCERPT_CHARS).collect();

    let mentions_quota = lowered.contains("quota")
        || lowered.contains("rate limit")
        || lowered.contains("rate_limit");

    if status == StatusCode::TOO_MANY_REQUESTS || mentions_quota {
        SummarizeError::ProviderQuota(format!("{provider} (status {status}): {excerpt}"))
    } else if status == StatusCode::REQUEST_TIMEOUT || status == StatusCode::GATEWAY_TIMEOUT {
        SummarizeError::ProviderTimeout(format!("{provider} (status {status}): {excerpt}"))
    } else {
        SummarizeError::Provider(format!("{provider} API error (status {status}): {excerpt}"))
    }
}

/// Pulls the generated text from a chat completions response.
#[must_use]
pub fn extract_completion_text(response: &Value) -> Option<String> {
    let first = response.get("choices")?.as_array()?.first()?;

    first
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .or_else(|| first.get("text").and_then(Value::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn build_chat_messages(prompt: &[ChatCompletionMessage]) -> Vec<Value> {
    prompt
        .iter()
        .filter_map(|msg| {
            let role_str = match msg.role {
                MessageRole::system => "system",
                MessageRole::user => "user",
                MessageRole::assistant => "assistant",
                MessageRole::function | MessageRole::tool => return None,
            };

            match &msg.content {
                Content::Text(text) => Some(json!({ "role": role_str, "content": text })),
                Content::ImageUrl(_) => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_chat_messages_keeps_system_and_user_text() {
        let prompt = vec![
            ChatCompletionMessage {
                role: MessageRole::system,
                content: Content::Text("policy".to_string()),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
            ChatCompletionMessage {
                role: MessageRole::tool,
                content: Content::Text("ignored".to_string()),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
            ChatCompletionMessage {
                role: MessageRole::user,
                content: Content::Text("hello".to_string()),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
        ];

        let messages = build_chat_messages(&prompt);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[1]["content"], "hello");
    }

    #[test]
    fn extract_completion_text_prefers_message_content() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "  A summary. "}}]});
        assert_eq!(extract_completion_text(&body).as_deref(), Some("A summary."));

        let legacy = json!({"choices": [{"text": "Legacy text"}]});
        assert_eq!(extract_completion_text(&legacy).as_deref(), Some("Legacy text"));

        assert!(extract_completion_text(&json!({"choices": []})).is_none());
        assert!(extract_completion_text(&json!({"choices": [{"message": {"content": "  "}}]})).is_none());
    }

    #[test]
    fn classify_failure_detects_quota_and_timeouts() {
        assert!(matches!(
            classify_failure("openai", StatusCode::TOO_MANY_REQUESTS, "slow down"),
            SummarizeError::ProviderQuota(_)
        ));
        assert!(matches!(
            classify_failure(
                "openai",
                StatusCode::FORBIDDEN,
                r#"{"error":{"code":"insufficient_quota"}}"#
            ),
            SummarizeError::ProviderQuota(_)
        ));
        assert!(matches!(
            classify_failure("groq", StatusCode::GATEWAY_TIMEOUT, ""),
            SummarizeError::ProviderTimeout(_)
        ));
        assert!(matches!(
            classify_failure("groq", StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            SummarizeError::Provider(ref m) if m.contains("boom") && m.contains("500")
        ));
    }

    #[tokio::test]
    async fn missing_api_key_is_reported_before_any_request() {
        let settings = ProviderSettings {
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            api_base: url::Url::parse("http://127.0.0.1:9").unwrap(),
            timeout: std::time::Duration::from_secs(1),
        };
        let client = LlmClient::new("openai", &settings, 0.2).unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:9/chat/completions");

        let request = SummarizeRequest::new("Some text.", None, None).unwrap();
        let err = client.summarize(&request).await.unwrap_err();
        assert!(matches!(err, SummarizeError::NotConfigured(_)));
    }
}
