//! Common helper functions for API handlers.
//!
//! Response builders and the mapping from `SummarizeError` to an HTTP
//! response with a `{detail}` body.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use crate::core::models::ErrorBody;
use crate::errors::SummarizeError;

// ============================================================================
// Response Builders
// ============================================================================

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            detail: message.to_string(),
        }),
    )
        .into_response()
}

impl IntoResponse for SummarizeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(%status, error = %self, "Summarization request failed");
        } else {
            warn!(%status, error = %self, "Summarization request rejected");
        }
        err_response(status, &self.detail())
    }
}

// ============================================================================
// Extractor rejections
// ============================================================================

#[must_use]
pub fn json_rejection(rejection: JsonRejection) -> SummarizeError {
    body_rejection(rejection.status(), rejection.body_text())
}

#[must_use]
pub fn form_rejection(rejection: FormRejection) -> SummarizeError {
    body_rejection(rejection.status(), rejection.body_text())
}

/// Multipart failures are either the body limit tripping or a malformed stream.
#[must_use]
pub fn multipart_error(err: &MultipartError, max_upload_bytes: usize) -> SummarizeError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        SummarizeError::FileTooLarge(max_upload_bytes)
    } else {
        SummarizeError::Validation(err.body_text())
    }
}

fn body_rejection(status: StatusCode, text: String) -> SummarizeError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        SummarizeError::BodyTooLarge
    } else {
        SummarizeError::Validation(text)
    }
}
