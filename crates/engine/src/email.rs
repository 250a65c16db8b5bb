use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use claimdesk_core::{Caller, ClaimId, ClaimdeskError, Job, JobKind};
use claimdesk_provider::Mailer;
use claimdesk_state::store::{ClaimStore, JobStore};

/// Sends claim summaries through the email-delivery collaborator.
pub struct EmailService {
    claims: Arc<dyn ClaimStore>,
    jobs: Arc<dyn JobStore>,
    mailer: Arc<dyn Mailer>,
}

impl EmailService {
    pub fn new(
        claims: Arc<dyn ClaimStore>,
        jobs: Arc<dyn JobStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            claims,
            jobs,
            mailer,
        }
    }

    /// Enqueue and execute an email-delivery job for the claim.
    pub async fn start_email(
        &self,
        caller: &Caller,
        claim_id: &ClaimId,
    ) -> Result<Job, ClaimdeskError> {
        let claim = self.claims.get(&caller.id, claim_id).await?;

        let job = self
            .jobs
            .enqueue(Job::enqueue(
                caller.id.clone(),
                JobKind::EmailDelivery,
                HashMap::from([("claim_id".to_owned(), serde_json::json!(claim_id.as_str()))]),
            ))
            .await?;
        self.jobs.start(&job.id).await?;

        if let Err(err) = self
            .mailer
            .send_claim(&claim, caller.email.as_deref())
            .await
        {
            let err = ClaimdeskError::from(err);
            self.jobs.fail(&job.id, &err.to_string()).await?;
            return Err(err);
        }

        let job = self
            .jobs
            .succeed(
                &job.id,
                HashMap::from([("sent".to_owned(), serde_json::json!(true))]),
            )
            .await?;

        info!(claim_id = %claim_id, job_id = %job.id, "claim email delivered");
        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use claimdesk_core::{Claim, ClaimType, JobStatus};
    use claimdesk_provider::{LogMailer, ProviderError};
    use claimdesk_state_memory::{MemoryClaimStore, MemoryJobStore};

    use super::*;

    struct DownMailer;

    #[async_trait]
    impl Mailer for DownMailer {
        async fn send_claim(
            &self,
            _claim: &Claim,
            _recipient: Option<&str>,
        ) -> Result<(), ProviderError> {
            Err(ProviderError::Unavailable("smtp refused".into()))
        }
    }

    #[tokio::test]
    async fn delivery_succeeds_with_sent_flag() {
        let claims: Arc<dyn ClaimStore> = Arc::new(MemoryClaimStore::new());
        let jobs: Arc<dyn JobStore> = Arc::new(MemoryJobStore::new());
        let caller = Caller::new("u1", Some("me@example.com".into()));
        let claim = claims
            .create(Claim::new(caller.id.clone(), ClaimType::Auto))
            .await
            .unwrap();

        let svc = EmailService::new(
            Arc::clone(&claims),
            Arc::clone(&jobs),
            Arc::new(LogMailer::new()),
        );
        let job = svc.start_email(&caller, &claim.id).await.unwrap();
        assert_eq!(job.status, JobStatus::Succeeded);
        assert_eq!(job.result["sent"], serde_json::json!(true));
    }

    #[tokio::test]
    async fn mailer_failure_fails_job_and_surfaces_unavailable() {
        let claims: Arc<dyn ClaimStore> = Arc::new(MemoryClaimStore::new());
        let jobs: Arc<dyn JobStore> = Arc::new(MemoryJobStore::new());
        let caller = Caller::new("u1", None);
        let claim = claims
            .create(Claim::new(caller.id.clone(), ClaimType::Auto))
            .await
            .unwrap();

        let svc = EmailService::new(Arc::clone(&claims), Arc::clone(&jobs), Arc::new(DownMailer));
        let err = svc.start_email(&caller, &claim.id).await.unwrap_err();
        assert!(matches!(err, ClaimdeskError::Unavailable(_)));

        // The failed job is terminal, so no email_delivery job is claimable.
        assert!(
            jobs.claim_next(JobKind::EmailDelivery)
                .await
                .unwrap()
                .is_none()
        );
    }
}
