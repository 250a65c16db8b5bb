use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use claimdesk_core::{Claim, ClaimDraft, ClaimId, ClaimdeskError, Job, JobKind, UserId};
use claimdesk_provider::DraftEngine;
use claimdesk_state::store::{ClaimStore, JobStore};

/// Confidence assigned to a draft generated from a complete claim.
const CONFIDENCE_CLEAN: f64 = 0.8;
/// Confidence assigned when completeness issues were found.
const CONFIDENCE_WITH_ISSUES: f64 = 0.6;

/// Generates claim drafts through the AI drafting collaborator.
///
/// `start_draft` runs the whole pipeline inline: the job it returns has
/// already reached a terminal state by the time the caller sees it.
pub struct DraftService {
    claims: Arc<dyn ClaimStore>,
    jobs: Arc<dyn JobStore>,
    engine: Arc<dyn DraftEngine>,
}

impl DraftService {
    pub fn new(
        claims: Arc<dyn ClaimStore>,
        jobs: Arc<dyn JobStore>,
        engine: Arc<dyn DraftEngine>,
    ) -> Self {
        Self {
            claims,
            jobs,
            engine,
        }
    }

    /// Enqueue and execute a draft-generation job for the claim.
    pub async fn start_draft(
        &self,
        caller: &UserId,
        claim_id: &ClaimId,
        notes: Option<String>,
    ) -> Result<Job, ClaimdeskError> {
        // Ownership check before any job is recorded.
        let claim = self.claims.get(caller, claim_id).await?;

        let mut payload = HashMap::from([(
            "claim_id".to_owned(),
            serde_json::json!(claim_id.as_str()),
        )]);
        if let Some(notes) = notes {
            payload.insert("notes".to_owned(), serde_json::json!(notes));
        }

        let job = self
            .jobs
            .enqueue(Job::enqueue(
                caller.clone(),
                JobKind::DraftGeneration,
                payload,
            ))
            .await?;
        self.jobs.start(&job.id).await?;
        self.jobs.advance_progress(&job.id, 20).await?;

        let content = match self.engine.draft(&claim).await {
            Ok(content) => content,
            Err(err) => {
                let err = ClaimdeskError::from(err);
                self.jobs.fail(&job.id, &err.to_string()).await?;
                return Err(err);
            }
        };
        self.jobs.advance_progress(&job.id, 70).await?;

        let issues = completeness_issues(&claim);
        let confidence = if issues.is_empty() {
            CONFIDENCE_CLEAN
        } else {
            CONFIDENCE_WITH_ISSUES
        };

        self.claims
            .save_draft(ClaimDraft {
                claim_id: claim_id.clone(),
                content,
                confidence,
                issues,
            })
            .await?;

        let job = self
            .jobs
            .succeed(
                &job.id,
                HashMap::from([
                    ("claim_id".to_owned(), serde_json::json!(claim_id.as_str())),
                    ("draft_ready".to_owned(), serde_json::json!(true)),
                ]),
            )
            .await?;

        info!(claim_id = %claim_id, job_id = %job.id, "draft generated");
        Ok(job)
    }
}

/// Collect human-readable completeness issues for a claim.
fn completeness_issues(claim: &Claim) -> Vec<String> {
    let mut issues = Vec::new();
    if claim.policy_number.is_none() {
        issues.push("Policy number missing".to_owned());
    }
    if claim.insurer_id.is_none() && claim.insurer_name.is_none() {
        issues.push("Provider not selected".to_owned());
    }
    if claim.incident_description.is_none() {
        issues.push("Incident description missing".to_owned());
    }
    issues
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use claimdesk_core::{ClaimType, JobStatus};
    use claimdesk_provider::{LocalDraftEngine, ProviderError};
    use claimdesk_state_memory::{MemoryClaimStore, MemoryJobStore};

    use super::*;

    struct BrokenEngine;

    #[async_trait]
    impl DraftEngine for BrokenEngine {
        async fn draft(&self, _claim: &Claim) -> Result<serde_json::Value, ProviderError> {
            Err(ProviderError::Unavailable("model offline".into()))
        }
    }

    fn service_with_engine(
        claims: Arc<MemoryClaimStore>,
        jobs: Arc<MemoryJobStore>,
        engine: Arc<dyn DraftEngine>,
    ) -> DraftService {
        DraftService::new(claims, jobs, engine)
    }

    #[tokio::test]
    async fn complete_claim_drafts_with_high_confidence() {
        let claims = Arc::new(MemoryClaimStore::new());
        let jobs = Arc::new(MemoryJobStore::new());
        let owner = UserId::from("u1");
        let claim = claims
            .create(
                Claim::new(owner.clone(), ClaimType::Auto)
                    .with_insurer("prov_abc")
                    .with_policy_number("ABC-123-456")
                    .with_incident_description("rear-ended at a light"),
            )
            .await
            .unwrap();

        let service = service_with_engine(
            Arc::clone(&claims),
            Arc::clone(&jobs),
            Arc::new(LocalDraftEngine::new()),
        );
        let job = service.start_draft(&owner, &claim.id, None).await.unwrap();

        assert_eq!(job.status, JobStatus::Succeeded);
        assert_eq!(job.progress, 100);
        assert_eq!(job.result["draft_ready"], serde_json::json!(true));

        let draft = claims.draft(&claim.id).await.unwrap().unwrap();
        assert!((draft.confidence - CONFIDENCE_CLEAN).abs() < f64::EPSILON);
        assert!(draft.issues.is_empty());
    }

    #[tokio::test]
    async fn sparse_claim_collects_issues() {
        let claims = Arc::new(MemoryClaimStore::new());
        let jobs = Arc::new(MemoryJobStore::new());
        let owner = UserId::from("u1");
        let claim = claims
            .create(Claim::new(owner.clone(), ClaimType::Home))
            .await
            .unwrap();

        let service = service_with_engine(
            Arc::clone(&claims),
            Arc::clone(&jobs),
            Arc::new(LocalDraftEngine::new()),
        );
        service.start_draft(&owner, &claim.id, None).await.unwrap();

        let draft = claims.draft(&claim.id).await.unwrap().unwrap();
        assert!((draft.confidence - CONFIDENCE_WITH_ISSUES).abs() < f64::EPSILON);
        assert_eq!(
            draft.issues,
            vec![
                "Policy number missing".to_owned(),
                "Provider not selected".to_owned(),
                "Incident description missing".to_owned(),
            ]
        );
    }

    #[tokio::test]
    async fn foreign_claim_is_not_found_and_no_job_is_recorded() {
        let claims = Arc::new(MemoryClaimStore::new());
        let jobs = Arc::new(MemoryJobStore::new());
        let claim = claims
            .create(Claim::new("owner", ClaimType::Auto))
            .await
            .unwrap();

        let service = service_with_engine(
            Arc::clone(&claims),
            Arc::clone(&jobs),
            Arc::new(LocalDraftEngine::new()),
        );
        let err = service
            .start_draft(&UserId::from("stranger"), &claim.id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimdeskError::NotFound("claim")));
    }

    #[tokio::test]
    async fn provider_failure_fails_the_job_and_surfaces_unavailable() {
        let claims = Arc::new(MemoryClaimStore::new());
        let jobs = Arc::new(MemoryJobStore::new());
        let owner = UserId::from("u1");
        let claim = claims
            .create(Claim::new(owner.clone(), ClaimType::Auto))
            .await
            .unwrap();

        let service = service_with_engine(
            Arc::clone(&claims),
            Arc::clone(&jobs),
            Arc::new(BrokenEngine),
        );
        let err = service
            .start_draft(&owner, &claim.id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimdeskError::Unavailable(_)));
        assert!(claims.draft(&claim.id).await.unwrap().is_none());
    }
}
