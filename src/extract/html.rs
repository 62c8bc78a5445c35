use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::SummarizeError;

const WRAP_WIDTH: usize = 10_000;

static NON_CONTENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|style|noscript)\b[^>]*>.*?</(script|style|noscript)\s*>")
        .expect("static regex compile")
});

pub(crate) fn extract(bytes: &[u8]) -> Result<String, SummarizeError> {
    let html = String::from_utf8_lossy(bytes);
    let cleaned = NON_CONTENT_RE.replace_all(&html, "");
    html2text::from_read(cleaned.as_bytes(), WRAP_WIDTH)
        .map_err(|e| SummarizeError::Extraction(format!("Failed to parse HTML: {e}")))
}
