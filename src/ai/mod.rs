//! LLM providers and the summarizer that fronts them.

pub mod client;
pub mod provider;
pub mod stub;
pub mod summarizer;

pub use client::LlmClient;
pub use provider::SummaryProvider;
pub use stub::StubProvider;
pub use summarizer::{Summarizer, Summary};
