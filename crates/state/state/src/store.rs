use std::collections::HashMap;

use async_trait::async_trait;

use claimdesk_core::{
    Caller, Claim, ClaimDraft, ClaimId, ClaimStatus, FileId, FileRecord, FileStatus, Insurer,
    InsurerId, Job, JobId, JobKind, PageLimit, ScanVerdict, UserId, Webhook,
};

use crate::error::StoreError;

/// Partial update for a claim. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ClaimPatch {
    pub insurer_id: Option<InsurerId>,
    pub insurer_name: Option<String>,
    pub policy_number: Option<String>,
    pub incident_description: Option<String>,
    pub incident_occurred_at: Option<String>,
    pub incident_location: Option<String>,
    pub incident_metadata: Option<HashMap<String, serde_json::Value>>,
    pub attachments: Option<Vec<FileId>>,
}

/// Filter and window for listing a caller's claims.
#[derive(Debug, Clone)]
pub struct ClaimFilter {
    /// Only return claims in this state, when set.
    pub status: Option<ClaimStatus>,
    /// Page size bound.
    pub limit: PageLimit,
    /// Decoded cursor: id of the last claim on the previous page.
    pub after: Option<String>,
}

impl Default for ClaimFilter {
    fn default() -> Self {
        Self {
            status: None,
            limit: PageLimit::default(),
            after: None,
        }
    }
}

/// One page of claims, newest first.
#[derive(Debug, Clone)]
pub struct ClaimPage {
    pub items: Vec<Claim>,
    /// Id of the last item, present only when more items remain.
    pub next_after: Option<String>,
}

/// One page of insurer directory entries.
#[derive(Debug, Clone)]
pub struct InsurerPage {
    pub items: Vec<Insurer>,
    pub next_after: Option<String>,
}

/// Keyed store for [`Claim`] records and their one-to-one drafts.
///
/// Every read that takes an owner enforces the ownership rule: an entity
/// that exists but belongs to a different caller is reported as
/// [`StoreError::NotFound`].
#[async_trait]
pub trait ClaimStore: Send + Sync {
    /// Insert a new claim.
    async fn create(&self, claim: Claim) -> Result<Claim, StoreError>;

    /// Fetch a claim owned by `owner`.
    async fn get(&self, owner: &UserId, id: &ClaimId) -> Result<Claim, StoreError>;

    /// Apply a partial update to a claim owned by `owner`.
    async fn update(
        &self,
        owner: &UserId,
        id: &ClaimId,
        patch: ClaimPatch,
    ) -> Result<Claim, StoreError>;

    /// List the caller's claims, newest first, with cursor pagination.
    async fn list(&self, owner: &UserId, filter: ClaimFilter) -> Result<ClaimPage, StoreError>;

    /// Transition a claim to `Finalized`.
    async fn finalize(&self, owner: &UserId, id: &ClaimId) -> Result<Claim, StoreError>;

    /// Create or replace the draft associated with a claim.
    async fn save_draft(&self, draft: ClaimDraft) -> Result<(), StoreError>;

    /// Fetch the draft associated with a claim, if one has been generated.
    async fn draft(&self, id: &ClaimId) -> Result<Option<ClaimDraft>, StoreError>;
}

/// Keyed store for [`FileRecord`] metadata.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Insert a new file record.
    async fn create(&self, file: FileRecord) -> Result<FileRecord, StoreError>;

    /// Fetch a file owned by `owner`.
    async fn get(&self, owner: &UserId, id: &FileId) -> Result<FileRecord, StoreError>;

    /// Move a file along the upload lifecycle (`Uploaded`, `Scanning`).
    async fn set_status(&self, id: &FileId, status: FileStatus) -> Result<FileRecord, StoreError>;

    /// Record a completed scan. The store derives the terminal status:
    /// `Ready` when the verdict is `Clean`, `Failed` otherwise.
    async fn record_scan(
        &self,
        id: &FileId,
        verdict: ScanVerdict,
        ocr_text: Option<String>,
    ) -> Result<FileRecord, StoreError>;
}

/// Keyed store for [`Job`] work items.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a freshly enqueued job.
    async fn enqueue(&self, job: Job) -> Result<Job, StoreError>;

    /// Fetch a job owned by `owner`. Never mutates state.
    async fn get(&self, owner: &UserId, id: &JobId) -> Result<Job, StoreError>;

    /// Find one `Queued` job of the given kind and atomically transition it
    /// to `Running`. Under concurrent pollers at most one caller can claim
    /// any given job; the others observe `None` or a different job.
    async fn claim_next(&self, kind: JobKind) -> Result<Option<Job>, StoreError>;

    /// Transition `Queued -> Running` for a job the caller just enqueued.
    async fn start(&self, id: &JobId) -> Result<Job, StoreError>;

    /// Advance progress; valid only while `Running` and only forward.
    async fn advance_progress(&self, id: &JobId, percent: u8) -> Result<Job, StoreError>;

    /// Terminal transition `Running -> Succeeded` with a result payload.
    async fn succeed(
        &self,
        id: &JobId,
        result: HashMap<String, serde_json::Value>,
    ) -> Result<Job, StoreError>;

    /// Terminal transition `Running -> Failed` with an error message.
    async fn fail(&self, id: &JobId, error: &str) -> Result<Job, StoreError>;
}

/// Read-only insurer directory.
#[async_trait]
pub trait InsurerDirectory: Send + Sync {
    /// Case-insensitive search over name and id.
    async fn search(
        &self,
        query: &str,
        limit: PageLimit,
        after: Option<String>,
    ) -> Result<InsurerPage, StoreError>;

    /// Fetch a single directory entry.
    async fn get(&self, id: &InsurerId) -> Result<Insurer, StoreError>;
}

/// Store for outgoing webhook registrations.
#[async_trait]
pub trait WebhookStore: Send + Sync {
    /// Register a new outgoing webhook.
    async fn register(&self, webhook: Webhook) -> Result<Webhook, StoreError>;

    /// List the caller's registrations.
    async fn list(&self, owner: &UserId) -> Result<Vec<Webhook>, StoreError>;
}

/// Store for caller profiles derived from verified identities.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert or refresh the profile for a caller.
    async fn upsert(&self, caller: Caller) -> Result<Caller, StoreError>;

    /// Fetch a caller profile.
    async fn get(&self, id: &UserId) -> Result<Option<Caller>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Verify object safety of the store traits.
    fn _assert_dyn_claim_store(_: &dyn ClaimStore) {}
    fn _assert_dyn_file_store(_: &dyn FileStore) {}
    fn _assert_dyn_job_store(_: &dyn JobStore) {}
    fn _assert_dyn_insurer_directory(_: &dyn InsurerDirectory) {}
    fn _assert_dyn_webhook_store(_: &dyn WebhookStore) {}
    fn _assert_dyn_user_store(_: &dyn UserStore) {}

    #[test]
    fn default_filter_has_no_constraints() {
        let filter = ClaimFilter::default();
        assert!(filter.status.is_none());
        assert!(filter.after.is_none());
    }
}
