use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use claimdesk_core::{
    Claim, ClaimDraft, ClaimStatus, ClaimType, FilePurpose, FileRecord, FileStatus, Insurer, Job,
    JobKind, JobStatus, ScanVerdict,
};
use claimdesk_engine::PolicyValidation;
use claimdesk_provider::UploadSlot;

/// Request body for `POST /v1/files`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateFileRequest {
    pub purpose: FilePurpose,
    pub content_type: String,
    #[serde(default)]
    pub filename: Option<String>,
    /// Declared upload size in bytes.
    #[serde(default)]
    pub bytes: Option<u64>,
}

/// Response for `POST /v1/files`: the slot the client uploads into.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateFileResponse {
    pub file_id: String,
    pub upload_url: String,
    #[schema(value_type = HashMap<String, String>)]
    pub headers: HashMap<String, String>,
}

impl CreateFileResponse {
    #[must_use]
    pub fn new(file: &FileRecord, slot: UploadSlot) -> Self {
        Self {
            file_id: file.id.to_string(),
            upload_url: slot.url,
            headers: slot.headers,
        }
    }
}

/// File metadata representation.
#[derive(Debug, Serialize, ToSchema)]
pub struct FileResponse {
    pub id: String,
    pub purpose: FilePurpose,
    pub content_type: String,
    pub filename: Option<String>,
    pub size: Option<u64>,
    pub status: FileStatus,
    pub virus_scan: ScanVerdict,
    pub ocr_text: Option<String>,
}

impl From<FileRecord> for FileResponse {
    fn from(file: FileRecord) -> Self {
        Self {
            id: file.id.to_string(),
            purpose: file.purpose,
            content_type: file.content_type,
            filename: file.filename,
            size: file.size,
            status: file.status,
            virus_scan: file.virus_scan,
            ocr_text: file.ocr_text,
        }
    }
}

/// Request body for `POST /v1/claims`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateClaimRequest {
    pub claim_type: ClaimType,
    #[serde(default)]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub provider_name: Option<String>,
    #[serde(default)]
    pub policy_number: Option<String>,
    #[serde(default)]
    pub incident_description: Option<String>,
    #[serde(default)]
    pub incident_occurred_at: Option<String>,
    #[serde(default)]
    pub incident_location: Option<String>,
    #[serde(default)]
    #[schema(value_type = HashMap<String, Object>)]
    pub incident_metadata: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub attachments: Vec<String>,
}

/// Request body for `PATCH /v1/claims/{claim_id}`. Absent fields are left
/// unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateClaimRequest {
    #[serde(default)]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub provider_name: Option<String>,
    #[serde(default)]
    pub policy_number: Option<String>,
    #[serde(default)]
    pub incident_description: Option<String>,
    #[serde(default)]
    pub incident_occurred_at: Option<String>,
    #[serde(default)]
    pub incident_location: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<HashMap<String, Object>>)]
    pub incident_metadata: Option<HashMap<String, serde_json::Value>>,
    #[serde(default)]
    pub attachments: Option<Vec<String>>,
}

/// Request body for `POST /v1/claims/{claim_id}/drafts`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StartDraftRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

/// Claim representation, including the generated draft when one exists.
#[derive(Debug, Serialize, ToSchema)]
pub struct ClaimResponse {
    pub id: String,
    pub status: ClaimStatus,
    pub claim_type: ClaimType,
    pub provider_id: Option<String>,
    pub provider_name: Option<String>,
    pub policy_number: Option<String>,
    pub incident_description: Option<String>,
    pub incident_occurred_at: Option<String>,
    pub incident_location: Option<String>,
    #[schema(value_type = HashMap<String, Object>)]
    pub incident_metadata: HashMap<String, serde_json::Value>,
    pub attachments: Vec<String>,
    #[schema(value_type = Option<Object>)]
    pub draft: Option<serde_json::Value>,
    pub confidence: Option<f64>,
    pub issues: Vec<String>,
}

impl ClaimResponse {
    /// Assemble the wire representation from a claim and its optional draft.
    #[must_use]
    pub fn assemble(claim: Claim, draft: Option<ClaimDraft>) -> Self {
        let (draft_content, confidence, issues) = match draft {
            Some(draft) => (Some(draft.content), Some(draft.confidence), draft.issues),
            None => (None, None, Vec::new()),
        };
        Self {
            id: claim.id.to_string(),
            status: claim.status,
            claim_type: claim.claim_type,
            provider_id: claim.insurer_id.map(|id| id.to_string()),
            provider_name: claim.insurer_name,
            policy_number: claim.policy_number,
            incident_description: claim.incident_description,
            incident_occurred_at: claim.incident_occurred_at,
            incident_location: claim.incident_location,
            incident_metadata: claim.incident_metadata,
            attachments: claim
                .attachments
                .into_iter()
                .map(|id| id.to_string())
                .collect(),
            draft: draft_content,
            confidence,
            issues,
        }
    }
}

/// One page of claims.
#[derive(Debug, Serialize, ToSchema)]
pub struct ClaimListResponse {
    pub items: Vec<ClaimResponse>,
    pub next_cursor: Option<String>,
}

/// Reduced claim view for the status poll endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ClaimStatusResponse {
    pub id: String,
    pub status: ClaimStatus,
}

/// Job representation.
#[derive(Debug, Serialize, ToSchema)]
pub struct JobResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: JobKind,
    pub status: JobStatus,
    pub progress: u8,
    #[schema(value_type = HashMap<String, Object>)]
    pub result: HashMap<String, serde_json::Value>,
    pub error: Option<String>,
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        Self {
            id: job.id.to_string(),
            kind: job.kind,
            status: job.status,
            progress: job.progress,
            result: job.result,
            error: job.error,
        }
    }
}

/// Response for `GET /v1/claims/{claim_id}/pdf`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PdfResponse {
    pub url: Option<String>,
}

/// Insurer directory entry representation.
#[derive(Debug, Serialize, ToSchema)]
pub struct InsurerResponse {
    pub id: String,
    pub name: String,
    pub claim_types: Vec<ClaimType>,
}

impl From<Insurer> for InsurerResponse {
    fn from(insurer: Insurer) -> Self {
        Self {
            id: insurer.id.to_string(),
            name: insurer.name,
            claim_types: insurer.claim_types,
        }
    }
}

/// One page of insurer directory entries.
#[derive(Debug, Serialize, ToSchema)]
pub struct InsurerListResponse {
    pub items: Vec<InsurerResponse>,
    pub next_cursor: Option<String>,
}

/// Request body for `POST /v1/providers/validate-policy`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PolicyValidationRequest {
    #[serde(default)]
    pub provider_id: Option<String>,
    pub claim_type: ClaimType,
    pub policy_number: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Result of a policy-number validation.
#[derive(Debug, Serialize, ToSchema)]
pub struct PolicyValidationResult {
    pub valid: bool,
    pub normalized: Option<String>,
    pub hints: Vec<String>,
}

impl From<PolicyValidation> for PolicyValidationResult {
    fn from(validation: PolicyValidation) -> Self {
        Self {
            valid: validation.valid,
            normalized: validation.normalized,
            hints: validation.hints,
        }
    }
}

/// The authenticated caller's profile.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub email: Option<String>,
}

/// Request body for `POST /v1/webhooks/outgoing`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterWebhookRequest {
    pub url: String,
}

/// Minimal acknowledgment body.
#[derive(Debug, Serialize, ToSchema)]
pub struct AckResponse {
    pub ok: bool,
}

/// Response for `GET /v1/health`.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}
