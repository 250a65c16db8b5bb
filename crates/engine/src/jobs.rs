use std::collections::HashMap;

use tracing::{info, warn};

use claimdesk_core::{ClaimdeskError, Job, JobKind};
use claimdesk_state::store::JobStore;

/// Claim and process one queued job of the given kind.
///
/// Returns `Ok(false)` when no queued job of that kind exists. The handler
/// produces the success result payload; a handler error marks the job
/// failed and is not propagated, so a polling worker keeps draining the
/// queue.
///
/// The request-path services execute their work inline, but every job they
/// enqueue goes through the same `claim_next` contract this loop uses, so
/// moving execution onto a worker pool is a wiring change, not a redesign.
pub async fn run_worker_once<F, Fut>(
    jobs: &dyn JobStore,
    kind: JobKind,
    handler: F,
) -> Result<bool, ClaimdeskError>
where
    F: FnOnce(Job) -> Fut,
    Fut: Future<Output = Result<HashMap<String, serde_json::Value>, ClaimdeskError>>,
{
    let Some(job) = jobs.claim_next(kind).await.map_err(ClaimdeskError::from)? else {
        return Ok(false);
    };

    match handler(job.clone()).await {
        Ok(result) => {
            jobs.succeed(&job.id, result)
                .await
                .map_err(ClaimdeskError::from)?;
            info!(job_id = %job.id, kind = %kind, "worker completed job");
        }
        Err(err) => {
            jobs.fail(&job.id, &err.to_string())
                .await
                .map_err(ClaimdeskError::from)?;
            warn!(job_id = %job.id, kind = %kind, error = %err, "worker failed job");
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use claimdesk_core::{JobStatus, UserId};
    use claimdesk_state_memory::MemoryJobStore;

    use super::*;

    #[tokio::test]
    async fn empty_queue_returns_false() {
        let jobs = MemoryJobStore::new();
        let did_work = run_worker_once(&jobs, JobKind::FileScan, |_| async {
            Ok(HashMap::new())
        })
        .await
        .unwrap();
        assert!(!did_work);
    }

    #[tokio::test]
    async fn successful_handler_completes_the_job() {
        let jobs = MemoryJobStore::new();
        let owner = UserId::from("u1");
        let job = jobs
            .enqueue(Job::enqueue(owner.clone(), JobKind::FileScan, HashMap::new()))
            .await
            .unwrap();

        let did_work = run_worker_once(&jobs, JobKind::FileScan, |claimed| async move {
            assert_eq!(claimed.status, JobStatus::Running);
            Ok(HashMap::from([("ok".into(), serde_json::json!(true))]))
        })
        .await
        .unwrap();
        assert!(did_work);

        let done = jobs.get(&owner, &job.id).await.unwrap();
        assert_eq!(done.status, JobStatus::Succeeded);
        assert_eq!(done.progress, 100);
    }

    #[tokio::test]
    async fn handler_error_fails_the_job_without_propagating() {
        let jobs = MemoryJobStore::new();
        let owner = UserId::from("u1");
        let job = jobs
            .enqueue(Job::enqueue(owner.clone(), JobKind::EmailDelivery, HashMap::new()))
            .await
            .unwrap();

        let did_work = run_worker_once(&jobs, JobKind::EmailDelivery, |_| async {
            Err(ClaimdeskError::Unavailable("smtp down".into()))
        })
        .await
        .unwrap();
        assert!(did_work);

        let failed = jobs.get(&owner, &job.id).await.unwrap();
        assert_eq!(failed.status, JobStatus::Failed);
        assert!(failed.error.as_deref().unwrap().contains("smtp down"));
    }
}
