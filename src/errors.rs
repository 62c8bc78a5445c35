use axum::http::StatusCode;
use thiserror::Error;

use crate::core::models::ALLOWED_STYLES;

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("No text provided. Provide 'text' or upload a file with readable text.")]
    MissingInput,

    #[error("Invalid style '{0}'. Allowed: {allowed}", allowed = allowed_styles_list())]
    InvalidStyle(String),

    #[error("Request validation failed: {0}")]
    Validation(String),

    #[error("Unsupported file type '{0}'. Supported: {supported}", supported = crate::extract::SUPPORTED_EXTENSIONS.join(", "))]
    UnsupportedFileType(String),

    #[error("Unsupported content type '{0}'. Send application/json, multipart/form-data or application/x-www-form-urlencoded")]
    UnsupportedContentType(String),

    #[error("Uploaded file is too large. Max {0} bytes allowed.")]
    FileTooLarge(usize),

    #[error("Request body is too large.")]
    BodyTooLarge,

    #[error("{0}")]
    Extraction(String),

    #[error("Provider rate limited or out of quota: {0}")]
    ProviderQuota(String),

    #[error("Provider request timed out: {0}")]
    ProviderTimeout(String),

    #[error("LLM provider error: {0}")]
    Provider(String),

    #[error("Summarization provider is not configured: {0}")]
    NotConfigured(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SummarizeError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            SummarizeError::MissingInput
            | SummarizeError::InvalidStyle(_)
            | SummarizeError::Extraction(_) => StatusCode::BAD_REQUEST,
            SummarizeError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            SummarizeError::UnsupportedFileType(_) | SummarizeError::UnsupportedContentType(_) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            SummarizeError::FileTooLarge(_) | SummarizeError::BodyTooLarge => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            SummarizeError::ProviderQuota(_) => StatusCode::TOO_MANY_REQUESTS,
            SummarizeError::ProviderTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            SummarizeError::Provider(_) | SummarizeError::HttpError(_) => StatusCode::BAD_GATEWAY,
            SummarizeError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            SummarizeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-facing message for the `detail` field of an error response.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            SummarizeError::ProviderQuota(_) => {
                "The summarization provider is rate limited or out of quota. Please try again later."
                    .to_string()
            }
            SummarizeError::ProviderTimeout(_) => {
                "The summarization provider timed out. Please try again.".to_string()
            }
            SummarizeError::Internal(_) => {
                "Internal server error. Please try again later.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Quota and timeout failures are the ones a stub fallback may absorb.
    #[must_use]
    pub fn is_transient_provider_failure(&self) -> bool {
        matches!(
            self,
            SummarizeError::ProviderQuota(_) | SummarizeError::ProviderTimeout(_)
        )
    }
}

impl From<reqwest::Error> for SummarizeError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            SummarizeError::ProviderTimeout(error.to_string())
        } else {
            SummarizeError::HttpError(error.to_string())
        }
    }
}

impl From<serde_json::Error> for SummarizeError {
    fn from(error: serde_json::Error) -> Self {
        SummarizeError::Extraction(format!("Failed to parse JSON: {error}"))
    }
}

impl From<zip::result::ZipError> for SummarizeError {
    fn from(error: zip::result::ZipError) -> Self {
        SummarizeError::Extraction(format!("Failed to parse DOCX: {error}"))
    }
}

impl From<csv::Error> for SummarizeError {
    fn from(error: csv::Error) -> Self {
        SummarizeError::Extraction(format!("Failed to parse CSV: {error}"))
    }
}

/// Formats the list of allowed styles for messages that need it.
#[must_use]
pub fn allowed_styles_list() -> String {
    ALLOWED_STYLES.join(" | ")
}
