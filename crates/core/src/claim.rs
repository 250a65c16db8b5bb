use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ClaimId, FileId, InsurerId, UserId, prefixed_id};

/// Category of insurance claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ClaimType {
    Auto,
    Home,
    Health,
    Travel,
    Other,
}

impl ClaimType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Home => "home",
            Self::Health => "health",
            Self::Travel => "travel",
            Self::Other => "other",
        }
    }
}

/// Lifecycle state of a claim: editable draft until finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    Draft,
    Finalized,
}

impl ClaimStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Finalized => "finalized",
        }
    }
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An insurance claim record, owned exclusively by its creating caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Claim {
    /// Unique claim identifier.
    pub id: ClaimId,
    /// Caller that owns this claim.
    pub owner: UserId,
    /// Category of the claim.
    pub claim_type: ClaimType,
    /// Directory id of the insurer, when one was selected.
    pub insurer_id: Option<InsurerId>,
    /// Free-form insurer name, when typed in directly.
    pub insurer_name: Option<String>,
    /// Policy number as entered by the caller.
    pub policy_number: Option<String>,
    /// Free-form description of the incident.
    pub incident_description: Option<String>,
    /// When the incident occurred, as entered by the caller.
    pub incident_occurred_at: Option<String>,
    /// Where the incident occurred.
    pub incident_location: Option<String>,
    /// Arbitrary structured incident detail.
    #[cfg_attr(feature = "openapi", schema(value_type = HashMap<String, Object>))]
    pub incident_metadata: HashMap<String, serde_json::Value>,
    /// File attachments associated with this claim.
    pub attachments: Vec<FileId>,
    /// Current lifecycle state.
    pub status: ClaimStatus,
    /// Timestamp when the claim was created.
    pub created_at: DateTime<Utc>,
}

impl Claim {
    /// Create a new claim in `Draft` with a generated `clm_` identifier.
    #[must_use]
    pub fn new(owner: impl Into<UserId>, claim_type: ClaimType) -> Self {
        Self {
            id: ClaimId::new(prefixed_id("clm")),
            owner: owner.into(),
            claim_type,
            insurer_id: None,
            insurer_name: None,
            policy_number: None,
            incident_description: None,
            incident_occurred_at: None,
            incident_location: None,
            incident_metadata: HashMap::new(),
            attachments: Vec::new(),
            status: ClaimStatus::Draft,
            created_at: Utc::now(),
        }
    }

    /// Set the insurer directory reference.
    #[must_use]
    pub fn with_insurer(mut self, id: impl Into<InsurerId>) -> Self {
        self.insurer_id = Some(id.into());
        self
    }

    /// Set the policy number.
    #[must_use]
    pub fn with_policy_number(mut self, policy_number: impl Into<String>) -> Self {
        self.policy_number = Some(policy_number.into());
        self
    }

    /// Set the incident description.
    #[must_use]
    pub fn with_incident_description(mut self, description: impl Into<String>) -> Self {
        self.incident_description = Some(description.into());
        self
    }
}

/// A generated claim draft, one-to-one with a [`Claim`].
///
/// Written only by the draft service; callers never create one directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ClaimDraft {
    /// The claim this draft belongs to.
    pub claim_id: ClaimId,
    /// Structured draft content (summary, sections, notes).
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub content: serde_json::Value,
    /// Model confidence in [0, 1].
    pub confidence: f64,
    /// Human-readable issues found while drafting.
    pub issues: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_claim_is_draft() {
        let claim = Claim::new("user-1", ClaimType::Auto);
        assert_eq!(claim.status, ClaimStatus::Draft);
        assert!(claim.id.as_str().starts_with("clm_"));
        assert!(claim.attachments.is_empty());
    }

    #[test]
    fn builder_methods_set_fields() {
        let claim = Claim::new("user-1", ClaimType::Home)
            .with_insurer("prov_abc")
            .with_policy_number("ABC-123-456")
            .with_incident_description("pipe burst");
        assert_eq!(claim.insurer_id.as_deref(), Some("prov_abc"));
        assert_eq!(claim.policy_number.as_deref(), Some("ABC-123-456"));
        assert_eq!(claim.incident_description.as_deref(), Some("pipe burst"));
    }

    #[test]
    fn claim_type_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ClaimType::Travel).unwrap(),
            "\"travel\""
        );
    }

    #[test]
    fn claim_serde_roundtrip() {
        let claim = Claim::new("user-1", ClaimType::Other);
        let json = serde_json::to_string(&claim).unwrap();
        let back: Claim = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, claim.id);
        assert_eq!(back.status, ClaimStatus::Draft);
    }
}
