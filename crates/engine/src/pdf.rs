use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::info;

use claimdesk_core::{ClaimId, ClaimdeskError, Job, JobKind, UserId};
use claimdesk_provider::PdfRenderer;
use claimdesk_state::store::{ClaimStore, JobStore};

/// Generates claim PDFs and remembers the rendered document URL per claim.
///
/// The URL map is owned by the service instance and constructed once at
/// startup; re-rendering simply replaces the stored URL.
pub struct PdfService {
    claims: Arc<dyn ClaimStore>,
    jobs: Arc<dyn JobStore>,
    renderer: Arc<dyn PdfRenderer>,
    urls: DashMap<String, String>,
}

impl PdfService {
    pub fn new(
        claims: Arc<dyn ClaimStore>,
        jobs: Arc<dyn JobStore>,
        renderer: Arc<dyn PdfRenderer>,
    ) -> Self {
        Self {
            claims,
            jobs,
            renderer,
            urls: DashMap::new(),
        }
    }

    /// Enqueue and execute a PDF-generation job for the claim.
    pub async fn start_pdf(
        &self,
        caller: &UserId,
        claim_id: &ClaimId,
    ) -> Result<Job, ClaimdeskError> {
        let claim = self.claims.get(caller, claim_id).await?;
        let draft = self.claims.draft(claim_id).await?;

        let job = self
            .jobs
            .enqueue(Job::enqueue(
                caller.clone(),
                JobKind::PdfGeneration,
                HashMap::from([("claim_id".to_owned(), serde_json::json!(claim_id.as_str()))]),
            ))
            .await?;
        self.jobs.start(&job.id).await?;

        let url = match self.renderer.render(&claim, draft.as_ref()).await {
            Ok(url) => url,
            Err(err) => {
                let err = ClaimdeskError::from(err);
                self.jobs.fail(&job.id, &err.to_string()).await?;
                return Err(err);
            }
        };

        self.urls.insert(claim_id.to_string(), url.clone());
        let job = self
            .jobs
            .succeed(
                &job.id,
                HashMap::from([("url".to_owned(), serde_json::json!(url))]),
            )
            .await?;

        info!(claim_id = %claim_id, job_id = %job.id, "claim pdf rendered");
        Ok(job)
    }

    /// Fetch the rendered document URL, if the claim has been rendered.
    pub async fn get_pdf(
        &self,
        caller: &UserId,
        claim_id: &ClaimId,
    ) -> Result<Option<String>, ClaimdeskError> {
        // Ownership gate before the URL lookup.
        self.claims.get(caller, claim_id).await?;
        Ok(self.urls.get(claim_id.as_str()).map(|url| url.clone()))
    }
}

#[cfg(test)]
mod tests {
    use claimdesk_core::{Claim, ClaimType, JobStatus};
    use claimdesk_provider::LocalPdfRenderer;
    use claimdesk_state_memory::{MemoryClaimStore, MemoryJobStore};

    use super::*;

    fn service(claims: Arc<MemoryClaimStore>, jobs: Arc<MemoryJobStore>) -> PdfService {
        PdfService::new(
            claims,
            jobs,
            Arc::new(LocalPdfRenderer::new("https://storage.local")),
        )
    }

    #[tokio::test]
    async fn render_stores_url_and_succeeds_job() {
        let claims = Arc::new(MemoryClaimStore::new());
        let jobs = Arc::new(MemoryJobStore::new());
        let owner = UserId::from("u1");
        let claim = claims
            .create(Claim::new(owner.clone(), ClaimType::Auto))
            .await
            .unwrap();

        let svc = service(Arc::clone(&claims), Arc::clone(&jobs));
        assert!(svc.get_pdf(&owner, &claim.id).await.unwrap().is_none());

        let job = svc.start_pdf(&owner, &claim.id).await.unwrap();
        assert_eq!(job.status, JobStatus::Succeeded);

        let url = svc.get_pdf(&owner, &claim.id).await.unwrap().unwrap();
        assert!(url.ends_with(&format!("{}.pdf", claim.id)));
        assert_eq!(job.result["url"], serde_json::json!(url));
    }

    #[tokio::test]
    async fn foreign_claim_pdf_is_not_found() {
        let claims = Arc::new(MemoryClaimStore::new());
        let jobs = Arc::new(MemoryJobStore::new());
        let claim = claims
            .create(Claim::new("owner", ClaimType::Auto))
            .await
            .unwrap();

        let svc = service(Arc::clone(&claims), Arc::clone(&jobs));
        let err = svc
            .get_pdf(&UserId::from("stranger"), &claim.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimdeskError::NotFound("claim")));
    }
}
