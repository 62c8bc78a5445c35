//! Turns uploaded documents into plain text.
//!
//! The format is chosen from the file extension first, then the declared
//! content type, then the leading magic bytes. An extension that is present
//! but not recognised is rejected outright rather than guessed at.

mod docx;
mod html;
mod pdf;
mod rtf;
mod structured;
mod tabular;
mod text;

use std::path::Path;

use tracing::debug;

use crate::errors::SummarizeError;

pub const SUPPORTED_EXTENSIONS: [&str; 11] = [
    "txt", "text", "md", "markdown", "pdf", "docx", "csv", "json", "html", "htm", "rtf",
];

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Text,
    Markdown,
    Pdf,
    Docx,
    Csv,
    Json,
    Html,
    Rtf,
}

impl FileKind {
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" | "text" => Some(FileKind::Text),
            "md" | "markdown" => Some(FileKind::Markdown),
            "pdf" => Some(FileKind::Pdf),
            "docx" => Some(FileKind::Docx),
            "csv" => Some(FileKind::Csv),
            "json" => Some(FileKind::Json),
            "html" | "htm" => Some(FileKind::Html),
            "rtf" => Some(FileKind::Rtf),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "" | "application/octet-stream" => return None,
            "text/markdown" | "text/x-markdown" => return Some(FileKind::Markdown),
            "application/rtf" | "text/rtf" => return Some(FileKind::Rtf),
            DOCX_MIME => return Some(FileKind::Docx),
            _ => {}
        }

        mime_guess::get_mime_extensions_str(&essence)
            .and_then(|exts| exts.iter().find_map(|ext| Self::from_extension(ext)))
    }

    #[must_use]
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"%PDF") {
            Some(FileKind::Pdf)
        } else if bytes.starts_with(b"{\\rtf") {
            Some(FileKind::Rtf)
        } else if bytes.starts_with(b"PK\x03\x04") {
            Some(FileKind::Docx)
        } else if std::str::from_utf8(bytes).is_ok() {
            Some(FileKind::Text)
        } else {
            None
        }
    }

    /// Resolves the format of an upload.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFileType` when the extension is unknown, or when
    /// neither the content type nor the bytes identify a supported format.
    pub fn detect(
        bytes: &[u8],
        filename: Option<&str>,
        content_type: Option<&str>,
    ) -> Result<Self, SummarizeError> {
        let extension = filename
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty());

        if let Some(ext) = extension {
            return Self::from_extension(ext)
                .ok_or_else(|| SummarizeError::UnsupportedFileType(ext.to_ascii_lowercase()));
        }

        content_type
            .and_then(Self::from_content_type)
            .or_else(|| Self::from_magic(bytes))
            .ok_or_else(|| {
                SummarizeError::UnsupportedFileType(
                    content_type.unwrap_or("unknown").to_string(),
                )
            })
    }
}

/// Extracts trimmed plain text from an uploaded document.
///
/// # Errors
///
/// Returns `UnsupportedFileType` for unrecognised formats and `Extraction`
/// when the document cannot be parsed.
pub fn extract_text(
    bytes: &[u8],
    filename: Option<&str>,
    content_type: Option<&str>,
) -> Result<String, SummarizeError> {
    let kind = FileKind::detect(bytes, filename, content_type)?;
    debug!(?kind, size = bytes.len(), "Extracting text from upload");
    extract_as(kind, bytes)
}

/// Extracts text assuming the bytes are of the given kind.
///
/// # Errors
///
/// Returns `Extraction` when the document cannot be parsed.
pub fn extract_as(kind: FileKind, bytes: &[u8]) -> Result<String, SummarizeError> {
    let raw = match kind {
        FileKind::Text | FileKind::Markdown => text::decode(bytes),
        FileKind::Pdf => pdf::extract(bytes)?,
        FileKind::Docx => docx::extract(bytes)?,
        FileKind::Csv => tabular::extract(bytes)?,
        FileKind::Json => structured::extract(bytes)?,
        FileKind::Html => html::extract(bytes)?,
        FileKind::Rtf => rtf::extract(bytes),
    };
    Ok(raw.trim().to_string())
}
