//! Content provider seam.
//!
//! A [`ContentProvider`] returns the raw JSON text produced by the model. Decoding,
//! validation and the conversion of failures into fallback objects happen in
//! [`service::ContentService`], so callers above it never see an error.

pub mod gemini;
pub mod prompt;
pub mod service;

pub use gemini::GeminiProvider;
pub use service::ContentService;

use crate::error::ProviderError;
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRequest {
    pub topic: String,
    pub sub_topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdeaRequest {
    pub skill: String,
    pub interest: String,
}

#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Model name, shown in the navigation footer.
    fn name(&self) -> &str;

    async fn generate_section(&self, request: &SectionRequest) -> Result<String, ProviderError>;

    async fn evaluate_idea(&self, request: &IdeaRequest) -> Result<String, ProviderError>;
}
