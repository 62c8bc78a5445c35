use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SummarizeError;
use crate::prompt::sanitize_input;

pub const ALLOWED_STYLES: [&str; 3] = ["brief", "detailed", "bullets"];

/// Controls which instruction is sent to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Brief,
    Detailed,
    Bullets,
}

impl Style {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Style::Brief => "brief",
            Style::Detailed => "detailed",
            Style::Bullets => "bullets",
        }
    }

    /// Absent or blank values fall back to `brief`; anything unrecognised is rejected.
    pub fn parse_optional(raw: Option<&str>) -> Result<Self, SummarizeError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Style::default()),
            Some(value) => value.parse(),
        }
    }
}

impl FromStr for Style {
    type Err = SummarizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brief" => Ok(Style::Brief),
            "detailed" => Ok(Style::Detailed),
            "bullets" => Ok(Style::Bullets),
            _ => Err(SummarizeError::InvalidStyle(s.to_string())),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw JSON body as posted by the frontend, before validation.
#[derive(Debug, Default, Deserialize)]
pub struct SummarizeBody {
    pub text: Option<String>,
    pub style: Option<String>,
    pub max_tokens: Option<i64>,
}

/// Urlencoded form body. Browsers send blank inputs as empty strings, so
/// `max_tokens` stays textual until the handler parses it.
#[derive(Debug, Default, Deserialize)]
pub struct SummarizeForm {
    pub text: Option<String>,
    pub style: Option<String>,
    pub max_tokens: Option<String>,
}

/// A validated summarization request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizeRequest {
    pub text: String,
    pub style: Style,
    pub max_tokens: Option<u32>,
}

impl SummarizeRequest {
    pub fn new(
        text: &str,
        style: Option<&str>,
        max_tokens: Option<i64>,
    ) -> Result<Self, SummarizeError> {
        let sanitized = sanitize_input(text);
        let text = sanitized.trim();
        if text.is_empty() {
            return Err(SummarizeError::MissingInput);
        }

        let style = Style::parse_optional(style)?;

        let max_tokens = match max_tokens {
            None => None,
            Some(n) if n <= 0 => {
                return Err(SummarizeError::Validation(
                    "max_tokens must be a positive integer".to_string(),
                ));
            }
            Some(n) => Some(u32::try_from(n).map_err(|_| {
                SummarizeError::Validation(format!("max_tokens must be at most {}", u32::MAX))
            })?),
        };

        Ok(Self {
            text: text.to_string(),
            style,
            max_tokens,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
    pub style: Style,
    pub provider: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
    pub service: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_defaults_to_brief_when_absent_or_blank() {
        assert_eq!(Style::parse_optional(None).unwrap(), Style::Brief);
        assert_eq!(Style::parse_optional(Some("  ")).unwrap(), Style::Brief);
    }

    #[test]
    fn style_parsing_is_case_insensitive() {
        assert_eq!("Bullets".parse::<Style>().unwrap(), Style::Bullets);
        assert_eq!(" DETAILED ".parse::<Style>().unwrap(), Style::Detailed);
    }

    #[test]
    fn unknown_style_is_rejected() {
        let err = "poem".parse::<Style>().unwrap_err();
        assert!(matches!(err, SummarizeError::InvalidStyle(ref s) if s == "poem"));
        assert!(err.to_string().contains("brief | detailed | bullets"));
    }

    #[test]
    fn request_trims_text_and_rejects_blank() {
        let req = SummarizeRequest::new("  hello world \n", None, None).unwrap();
        assert_eq!(req.text, "hello world");
        assert!(matches!(
            SummarizeRequest::new(" \n\t", Some("brief"), None),
            Err(SummarizeError::MissingInput)
        ));
    }

    #[test]
    fn request_with_only_control_characters_is_missing_input() {
        assert!(matches!(
            SummarizeRequest::new("\u{0007}\u{0001}", None, None),
            Err(SummarizeError::MissingInput)
        ));
        let req = SummarizeRequest::new("a\u{0000}b\n", None, None).unwrap();
        assert_eq!(req.text, "ab");
    }

    #[test]
    fn request_rejects_non_positive_max_tokens() {
        for bad in [0, -5] {
            let err = SummarizeRequest::new("text", None, Some(bad)).unwrap_err();
            assert!(matches!(err, SummarizeError::Validation(_)));
        }
        let ok = SummarizeRequest::new("text", None, Some(128)).unwrap();
        assert_eq!(ok.max_tokens, Some(128));
    }

    #[test]
    fn style_serializes_lowercase() {
        let resp = SummarizeResponse {
            summary: "s".into(),
            style: Style::Bullets,
            provider: "stub".into(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["style"], "bullets");
    }
}
