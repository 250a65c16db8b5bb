use async_trait::async_trait;

use claimdesk_core::Claim;

use crate::error::ProviderError;

/// AI drafting collaborator: turns claim fields into structured draft content.
///
/// The engine produces content only; confidence scoring and issue detection
/// stay with the draft service, which knows the claim's completeness rules.
#[async_trait]
pub trait DraftEngine: Send + Sync {
    /// Generate draft content for the given claim.
    async fn draft(&self, claim: &Claim) -> Result<serde_json::Value, ProviderError>;
}

/// Deterministic local drafting engine.
///
/// Builds a fixed three-section draft from the incident description, which
/// keeps development and tests independent of any remote model.
#[derive(Debug, Default)]
pub struct LocalDraftEngine;

impl LocalDraftEngine {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DraftEngine for LocalDraftEngine {
    async fn draft(&self, claim: &Claim) -> Result<serde_json::Value, ProviderError> {
        let description = claim.incident_description.as_deref().unwrap_or("");
        let summary = if description.is_empty() {
            "No incident description provided.".to_owned()
        } else {
            description.chars().take(200).collect()
        };

        Ok(serde_json::json!({
            "summary": summary,
            "sections": [
                {"title": "Incident", "text": if description.is_empty() { "TBD" } else { description }},
                {"title": "Damages", "text": "TBD"},
                {"title": "Requested Action", "text": "Please process this claim promptly."},
            ],
            "notes": [],
        }))
    }
}
