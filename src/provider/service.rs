use crate::error::ContentError;
use crate::provider::{ContentProvider, IdeaRequest, SectionRequest};
use crate::report::{GeneratedContent, ProjectIdea};
use std::sync::Arc;
use tracing::{error, info};

/// Boundary around a [`ContentProvider`]: decodes, validates, and turns every
/// failure into a fallback value instead of an error.
#[derive(Clone)]
pub struct ContentService {
    provider: Arc<dyn ContentProvider>,
}

impl ContentService {
    pub fn new(provider: Arc<dyn ContentProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Always returns content. Failures come back with `fallback` set and an
    /// error notice as markdown.
    pub async fn generate(&self, topic: &str, sub_topics: &[String]) -> GeneratedContent {
        let request = SectionRequest {
            topic: topic.to_string(),
            sub_topics: sub_topics.to_vec(),
        };
        match self.try_generate(&request).await {
            Ok(content) => content,
            Err(err) => {
                error!(topic, error = %err, "section generation failed");
                GeneratedContent::fallback(&err)
            }
        }
    }

    async fn try_generate(&self, request: &SectionRequest) -> Result<GeneratedContent, ContentError> {
        let text = self.provider.generate_section(request).await?;
        Ok(GeneratedContent::from_json(&text)?)
    }

    /// Always returns an idea; on failure the placeholder with zero credits.
    pub async fn evaluate_idea(&self, skill: &str, interest: &str) -> ProjectIdea {
        let request = IdeaRequest {
            skill: skill.to_string(),
            interest: interest.to_string(),
        };
        match self.try_evaluate(&request).await {
            Ok(idea) => {
                info!(project = %idea.project_name, credits = idea.energy_credits, "idea evaluated");
                idea
            }
            Err(err) => {
                error!(error = %err, "idea evaluation failed");
                ProjectIdea::placeholder()
            }
        }
    }

    async fn try_evaluate(&self, request: &IdeaRequest) -> Result<ProjectIdea, ContentError> {
        let text = self.provider.evaluate_idea(request).await?;
        Ok(ProjectIdea::from_json(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use async_trait::async_trait;
    use serde_json::json;

    struct FixedProvider {
        section: Result<String, ProviderError>,
        idea: Result<String, ProviderError>,
    }

    #[async_trait]
    impl ContentProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn generate_section(&self, _request: &SectionRequest) -> Result<String, ProviderError> {
            self.section.clone()
        }

        async fn evaluate_idea(&self, _request: &IdeaRequest) -> Result<String, ProviderError> {
            self.idea.clone()
        }
    }

    fn service(
        section: Result<&str, ProviderError>,
        idea: Result<&str, ProviderError>,
    ) -> ContentService {
        ContentService::new(Arc::new(FixedProvider {
            section: section.map(str::to_string),
            idea: idea.map(str::to_string),
        }))
    }

    #[tokio::test]
    async fn valid_section_payload_passes_through() {
        let payload = json!({"markdown": "## Hello", "chartType": "pie"}).to_string();
        let service = service(Ok(payload.as_str()), Ok("{}"));
        let content = service.generate("Intro", &[]).await;
        assert!(!content.fallback);
        assert_eq!(content.markdown, "## Hello");
    }

    #[tokio::test]
    async fn payload_without_markdown_becomes_fallback() {
        let service = service(Ok(r#"{"chartType":"bar"}"#), Ok("{}"));
        let content = service.generate("Intro", &[]).await;
        assert!(content.fallback);
        assert!(!content.markdown.trim().is_empty());
        assert!(content.markdown.contains("markdown"));
    }

    #[tokio::test]
    async fn garbage_payload_becomes_fallback() {
        let service = service(Ok("not json at all"), Ok("{}"));
        let content = service.generate("Intro", &[]).await;
        assert!(content.fallback);
        assert!(!content.markdown.is_empty());
    }

    #[tokio::test]
    async fn provider_fault_becomes_fallback() {
        let service = service(Err(ProviderError::Network("reset".to_string())), Ok("{}"));
        let content = service.generate("Intro", &[]).await;
        assert!(content.fallback);
        assert!(content.markdown.contains("reset"));
    }

    #[tokio::test]
    async fn idea_credits_are_finite_and_in_range() {
        let service = service(
            Ok("{}"),
            Ok(r#"{"projectName":"Tide Archive","description":"d","energyCredits":1200,"reasoning":"r"}"#),
        );
        let idea = service.evaluate_idea("writing", "oceans").await;
        assert!(!idea.placeholder);
        assert!(idea.energy_credits.is_finite());
        assert_eq!(idea.energy_credits, 1200.0);
    }

    #[tokio::test]
    async fn idea_failure_returns_placeholder() {
        let service = service(Ok("{}"), Err(ProviderError::MissingCredential));
        let idea = service.evaluate_idea("cooking", "history").await;
        assert!(idea.placeholder);
        assert_eq!(idea.energy_credits, 0.0);
        assert_eq!(idea.project_name, "시스템 오류");
    }
}
