use std::panic::{self, AssertUnwindSafe};

use tracing::warn;

use crate::errors::SummarizeError;

pub(crate) fn extract(bytes: &[u8]) -> Result<String, SummarizeError> {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    }));

    match outcome {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(SummarizeError::Extraction(format!("Failed to parse PDF: {e}"))),
        Err(_) => {
            warn!(size = bytes.len(), "PDF parser panicked");
            Err(SummarizeError::Extraction(
                "Failed to parse PDF: the document is malformed".to_string(),
            ))
        }
    }
}
