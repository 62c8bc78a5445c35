use std::env;
use std::time::Duration;

use url::Url;

pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;
pub const DEFAULT_MAX_INPUT_CHARS: usize = 100_000;

/// Which backend answers summarization requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Stub,
    Groq,
    OpenAi,
}

/// Connection settings for one OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: Url,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
    pub max_input_chars: usize,
    pub use_stub: bool,
    pub use_groq: bool,
    pub groq: ProviderSettings,
    pub openai: ProviderSettings,
    pub temperature: f32,
    pub fallback_to_stub: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, so callers other than the
    /// process environment (tests, embedding) can supply values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let groq_api_key = get("GROQ_API_KEY");
        let use_groq = parse_flag(get("USE_GROQ").as_deref());

        Ok(Self {
            host: get("BACKEND_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_number("BACKEND_PORT", get("BACKEND_PORT"), 8000)?,
            allowed_origins: parse_origins(get("FRONTEND_ALLOW_ORIGINS").as_deref()),
            max_upload_bytes: parse_number(
                "MAX_UPLOAD_BYTES",
                get("MAX_UPLOAD_BYTES"),
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
            max_input_chars: parse_number(
                "MAX_INPUT_CHARS",
                get("MAX_INPUT_CHARS"),
                DEFAULT_MAX_INPUT_CHARS,
            )?,
            use_stub: parse_flag(get("USE_STUB").as_deref()),
            use_groq,
            groq: ProviderSettings {
                api_key: groq_api_key,
                model: get("GROQ_MODEL").unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string()),
                api_base: parse_url(
                    "GROQ_API_BASE",
                    get("GROQ_API_BASE").as_deref().unwrap_or(DEFAULT_GROQ_API_BASE),
                )?,
                timeout: parse_seconds("GROQ_TIMEOUT_SEC", get("GROQ_TIMEOUT_SEC"), 10.0)?,
            },
            openai: ProviderSettings {
                api_key: get("OPENAI_API_KEY"),
                model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
                api_base: parse_url(
                    "OPENAI_API_BASE",
                    get("OPENAI_API_BASE")
                        .as_deref()
                        .unwrap_or(DEFAULT_OPENAI_API_BASE),
                )?,
                timeout: parse_seconds("OPENAI_TIMEOUT_SEC", get("OPENAI_TIMEOUT_SEC"), 60.0)?,
            },
            temperature: parse_number("LLM_TEMPERATURE", get("LLM_TEMPERATURE"), 0.2)?,
            fallback_to_stub: parse_flag(get("LLM_FALLBACK_TO_STUB").as_deref()),
        })
    }

    /// Stub wins over everything; Groq is preferred when requested or when a key is present.
    #[must_use]
    pub fn provider_kind(&self) -> ProviderKind {
        if self.use_stub {
            ProviderKind::Stub
        } else if self.use_groq || self.groq.api_key.is_some() {
            ProviderKind::Groq
        } else {
            ProviderKind::OpenAi
        }
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(raw: Option<&str>) -> bool {
    raw.is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

fn parse_number<T: std::str::FromStr>(
    key: &str,
    raw: Option<String>,
    default: T,
) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(v) => v.parse().map_err(|e| format!("{key}: {e}")),
    }
}

fn parse_seconds(key: &str, raw: Option<String>, default: f64) -> Result<Duration, String> {
    let secs: f64 = parse_number(key, raw, default)?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("{key}: {e}"))
}

fn parse_url(key: &str, raw: &str) -> Result<Url, String> {
    Url::parse(raw.trim_end_matches('/')).map_err(|e| format!("{key}: {e}"))
}

fn parse_origins(raw: Option<&str>) -> Vec<String> {
    let origins: Vec<String> = raw
        .unwrap_or(DEFAULT_ALLOWED_ORIGIN)
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(ToString::to_string)
        .collect();

    if origins.is_empty() {
        vec![DEFAULT_ALLOWED_ORIGIN.to_string()]
    } else {
        origins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
        assert_eq!(config.allowed_origins, vec![DEFAULT_ALLOWED_ORIGIN]);
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(config.groq.timeout, Duration::from_secs(10));
        assert_eq!(config.openai.model, DEFAULT_OPENAI_MODEL);
        assert_eq!(config.provider_kind(), ProviderKind::OpenAi);
        assert!(!config.fallback_to_stub);
    }

    #[test]
    fn groq_key_implies_groq_provider() {
        let config = config_from(&[("GROQ_API_KEY", "gsk_test")]).unwrap();
        assert_eq!(config.provider_kind(), ProviderKind::Groq);
    }

    #[test]
    fn stub_flag_overrides_provider_keys() {
        let config = config_from(&[
            ("USE_STUB", "Yes"),
            ("USE_GROQ", "1"),
            ("OPENAI_API_KEY", "sk-test"),
        ])
        .unwrap();
        assert_eq!(config.provider_kind(), ProviderKind::Stub);
    }

    #[test]
    fn origins_are_split_and_trimmed() {
        let config = config_from(&[(
            "FRONTEND_ALLOW_ORIGINS",
            " https://a.example , ,https://b.example",
        )])
        .unwrap();
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );

        let only_commas = config_from(&[("FRONTEND_ALLOW_ORIGINS", ", ,")]).unwrap();
        assert_eq!(only_commas.allowed_origins, vec![DEFAULT_ALLOWED_ORIGIN]);
    }

    #[test]
    fn invalid_numbers_are_reported_with_their_key() {
        let err = config_from(&[("BACKEND_PORT", "eighty")]).unwrap_err();
        assert!(err.starts_with("BACKEND_PORT"));

        let err = config_from(&[("GROQ_TIMEOUT_SEC", "-1")]).unwrap_err();
        assert!(err.starts_with("GROQ_TIMEOUT_SEC"));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = config_from(&[("OPENAI_API_BASE", "not a url")]).unwrap_err();
        assert!(err.starts_with("OPENAI_API_BASE"));
    }
}
