use async_trait::async_trait;

use crate::core::models::SummarizeRequest;
use crate::errors::SummarizeError;

/// A backend able to turn a validated request into summary text.
#[async_trait]
pub trait SummaryProvider: Send + Sync {
    /// Name reported back to clients in the `provider` field.
    fn name(&self) -> &str;

    async fn summarize(&self, request: &SummarizeRequest) -> Result<String, SummarizeError>;
}
