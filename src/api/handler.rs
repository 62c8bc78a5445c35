//! Request handlers for the summarization API.
//!
//! `POST /api/summarize` accepts the same fields three ways (JSON,
//! multipart upload, urlencoded form), resolves them to a single validated
//! request, and hands it to the configured summarizer.

use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::Response;
use axum::{Form, Json};
use tracing::{debug, info};

use super::AppState;
use super::helpers::{err_response, form_rejection, json_rejection, multipart_error};
use crate::core::models::{
    ServiceStatus, SummarizeBody, SummarizeForm, SummarizeRequest, SummarizeResponse,
};
use crate::errors::SummarizeError;
use crate::extract;

pub const SERVICE_NAME: &str = "document-summarizer";

/// An uploaded file as received, before text extraction.
#[derive(Debug)]
pub struct Upload {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Request fields gathered from any of the accepted encodings.
#[derive(Debug, Default)]
pub struct RawInput {
    pub text: Option<String>,
    pub style: Option<String>,
    pub max_tokens: Option<i64>,
    pub file: Option<Upload>,
}

impl From<SummarizeBody> for RawInput {
    fn from(body: SummarizeBody) -> Self {
        Self {
            text: body.text,
            style: body.style,
            max_tokens: body.max_tokens,
            file: None,
        }
    }
}

pub async fn service_status() -> Json<ServiceStatus> {
    Json(ServiceStatus {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn not_found() -> Response {
    err_response(StatusCode::NOT_FOUND, "Not Found")
}

/// Summarize text given directly or extracted from an uploaded file.
///
/// # Errors
///
/// Returns a `SummarizeError`, rendered as `{detail}` with the matching
/// status, for invalid input, unreadable files and provider failures.
#[tracing::instrument(level = "info", skip_all)]
pub async fn summarize(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<SummarizeResponse>, SummarizeError> {
    let input = read_input(&state, request).await?;
    let request = resolve_request(input).await?;

    info!(
        style = %request.style,
        chars = request.text.chars().count(),
        max_tokens = ?request.max_tokens,
        "Summarizing"
    );

    let summary = state.summarizer.summarize(&request).await?;

    info!(provider = %summary.provider, "Summary generated");

    Ok(Json(SummarizeResponse {
        summary: summary.text,
        style: request.style,
        provider: summary.provider,
    }))
}

async fn read_input(state: &AppState, request: Request) -> Result<RawInput, SummarizeError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    if content_type.starts_with("application/json") {
        let Json(body) = Json::<SummarizeBody>::from_request(request, state)
            .await
            .map_err(json_rejection)?;
        Ok(body.into())
    } else if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, state)
            .await
            .map_err(|r| SummarizeError::Validation(r.body_text()))?;
        read_multipart(multipart, state.config.max_upload_bytes).await
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(form) = Form::<SummarizeForm>::from_request(request, state)
            .await
            .map_err(form_rejection)?;
        Ok(RawInput {
            max_tokens: match form.max_tokens.as_deref() {
                Some(raw) => parse_max_tokens(raw)?,
                None => None,
            },
            text: form.text,
            style: form.style,
            file: None,
        })
    } else {
        Err(SummarizeError::UnsupportedContentType(content_type))
    }
}

/// Reads multipart fields, enforcing the upload limit while streaming the file.
pub async fn read_multipart(
    mut multipart: Multipart,
    max_upload_bytes: usize,
) -> Result<RawInput, SummarizeError> {
    let mut input = RawInput::default();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&e, max_upload_bytes))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().map(ToString::to_string);
                let content_type = field.content_type().map(ToString::to_string);
                let mut bytes = Vec::new();
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| multipart_error(&e, max_upload_bytes))?
                {
                    if bytes.len() + chunk.len() > max_upload_bytes {
                        return Err(SummarizeError::FileTooLarge(max_upload_bytes));
                    }
                    bytes.extend_from_slice(&chunk);
                }

                // Browsers post an empty, unnamed part when no file was picked.
                let no_file_picked =
                    bytes.is_empty() && filename.as_deref().is_none_or(str::is_empty);
                if !no_file_picked {
                    input.file = Some(Upload {
                        filename,
                        content_type,
                        bytes,
                    });
                }
            }
            "text" | "style" | "max_tokens" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(&e, max_upload_bytes))?;
                match name.as_str() {
                    "text" => input.text = Some(value),
                    "style" => input.style = Some(value),
                    _ => input.max_tokens = parse_max_tokens(&value)?,
                }
            }
            other => debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    Ok(input)
}

fn parse_max_tokens(raw: &str) -> Result<Option<i64>, SummarizeError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse().map(Some).map_err(|_| {
        SummarizeError::Validation(format!("max_tokens must be an integer, got '{raw}'"))
    })
}

/// Non-empty text wins; otherwise the upload is extracted off the async runtime.
pub async fn resolve_request(input: RawInput) -> Result<SummarizeRequest, SummarizeError> {
    let direct_text = input.text.filter(|t| !t.trim().is_empty());

    let text = match (direct_text, input.file) {
        (Some(text), _) => text,
        (None, Some(upload)) => {
            info!(
                filename = upload.filename.as_deref().unwrap_or("uploaded"),
                size = upload.bytes.len(),
                "Extracting text from uploaded file"
            );
            tokio::task::spawn_blocking(move || {
                extract::extract_text(
                    &upload.bytes,
                    upload.filename.as_deref(),
                    upload.content_type.as_deref(),
                )
            })
            .await
            .map_err(|e| SummarizeError::Internal(format!("extraction task failed: {e}")))??
        }
        (None, None) => return Err(SummarizeError::MissingInput),
    };

    SummarizeRequest::new(&text, input.style.as_deref(), input.max_tokens)
}
