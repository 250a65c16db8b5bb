use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;

use claimdesk_core::{ClaimdeskError, Job, JobId, JobKind, JobStatus, UserId};
use claimdesk_state::error::StoreError;
use claimdesk_state::store::JobStore;

/// In-memory [`JobStore`] backed by a [`DashMap`].
///
/// `claim_next` relies on the map's per-shard locking: the status re-check
/// and the transition to `Running` happen under the entry's write guard, so
/// two concurrent pollers can never claim the same job.
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    jobs: DashMap<String, Job>,
}

impl MemoryJobStore {
    /// Create a new, empty in-memory job store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn mutate<T>(
        &self,
        id: &JobId,
        apply: impl FnOnce(&mut Job) -> Result<T, ClaimdeskError>,
    ) -> Result<Job, StoreError> {
        let mut entry = self
            .jobs
            .get_mut(id.as_str())
            .ok_or(StoreError::NotFound("job"))?;
        apply(&mut entry).map_err(|e| StoreError::Conflict(e.to_string()))?;
        Ok(entry.clone())
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn enqueue(&self, job: Job) -> Result<Job, StoreError> {
        self.jobs.insert(job.id.to_string(), job.clone());
        Ok(job)
    }

    async fn get(&self, owner: &UserId, id: &JobId) -> Result<Job, StoreError> {
        self.jobs
            .get(id.as_str())
            .filter(|job| job.owner == *owner)
            .map(|job| job.value().clone())
            .ok_or(StoreError::NotFound("job"))
    }

    async fn claim_next(&self, kind: JobKind) -> Result<Option<Job>, StoreError> {
        // Snapshot candidate ids first so we never hold more than one shard
        // guard at a time.
        let candidates: Vec<String> = self
            .jobs
            .iter()
            .filter(|entry| entry.kind == kind && entry.status == JobStatus::Queued)
            .map(|entry| entry.key().clone())
            .collect();

        for id in candidates {
            if let Some(mut entry) = self.jobs.get_mut(&id) {
                // Re-check under the write guard; a concurrent poller may
                // have won the race between snapshot and lock.
                if entry.status == JobStatus::Queued && entry.start().is_ok() {
                    return Ok(Some(entry.clone()));
                }
            }
        }

        Ok(None)
    }

    async fn start(&self, id: &JobId) -> Result<Job, StoreError> {
        self.mutate(id, Job::start)
    }

    async fn advance_progress(&self, id: &JobId, percent: u8) -> Result<Job, StoreError> {
        self.mutate(id, |job| job.advance_progress(percent))
    }

    async fn succeed(
        &self,
        id: &JobId,
        result: HashMap<String, serde_json::Value>,
    ) -> Result<Job, StoreError> {
        self.mutate(id, |job| job.succeed(result))
    }

    async fn fail(&self, id: &JobId, error: &str) -> Result<Job, StoreError> {
        self.mutate(id, |job| job.fail(error))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use claimdesk_state::testing::run_job_store_conformance_tests;

    use super::*;

    #[tokio::test]
    async fn conformance() {
        let store = MemoryJobStore::new();
        run_job_store_conformance_tests(&store)
            .await
            .expect("conformance tests should pass");
    }

    #[tokio::test]
    async fn concurrent_claimers_get_at_most_one_winner() {
        let store = Arc::new(MemoryJobStore::new());
        let job = store
            .enqueue(Job::enqueue("u1", JobKind::FileScan, HashMap::new()))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.claim_next(JobKind::FileScan).await.unwrap()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if let Some(claimed) = handle.await.unwrap() {
                assert_eq!(claimed.id, job.id);
                winners += 1;
            }
        }
        assert_eq!(winners, 1, "exactly one claimer may win the job");
    }

    #[tokio::test]
    async fn claim_next_ignores_other_kinds() {
        let store = MemoryJobStore::new();
        store
            .enqueue(Job::enqueue("u1", JobKind::EmailDelivery, HashMap::new()))
            .await
            .unwrap();

        let claimed = store.claim_next(JobKind::PdfGeneration).await.unwrap();
        assert!(claimed.is_none());
    }

    #[tokio::test]
    async fn get_does_not_mutate() {
        let store = MemoryJobStore::new();
        let owner = UserId::from("u1");
        let job = store
            .enqueue(Job::enqueue(owner.clone(), JobKind::DraftGeneration, HashMap::new()))
            .await
            .unwrap();

        for _ in 0..3 {
            let fetched = store.get(&owner, &job.id).await.unwrap();
            assert_eq!(fetched.status, JobStatus::Queued);
            assert_eq!(fetched.progress, 0);
        }
    }
}
