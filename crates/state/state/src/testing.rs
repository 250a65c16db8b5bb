use std::collections::HashMap;

use claimdesk_core::{Claim, ClaimDraft, ClaimType, Job, JobKind, JobStatus, PageLimit, UserId};

use crate::error::StoreError;
use crate::idempotency::{Begin, IdempotencyStore};
use crate::store::{ClaimFilter, ClaimPatch, ClaimStore, JobStore};

fn owner() -> UserId {
    UserId::from("conformance-user")
}

fn stranger() -> UserId {
    UserId::from("conformance-stranger")
}

/// Run the full job store conformance test suite.
///
/// Call this from your backend's test module with a fresh store instance.
///
/// # Errors
///
/// Returns an error if any conformance test fails.
pub async fn run_job_store_conformance_tests(store: &dyn JobStore) -> Result<(), StoreError> {
    test_enqueue_then_get(store).await?;
    test_get_wrong_owner_is_not_found(store).await?;
    test_inline_lifecycle(store).await?;
    test_claim_next_takes_queued(store).await?;
    test_claim_next_empty_kind(store).await?;
    test_terminal_jobs_reject_mutation(store).await?;
    Ok(())
}

async fn test_enqueue_then_get(store: &dyn JobStore) -> Result<(), StoreError> {
    let job = store
        .enqueue(Job::enqueue(owner(), JobKind::DraftGeneration, HashMap::new()))
        .await?;
    let fetched = store.get(&owner(), &job.id).await?;
    assert_eq!(fetched.status, JobStatus::Queued, "fresh job should be queued");
    assert_eq!(fetched.progress, 0, "fresh job should be at 0 progress");
    Ok(())
}

async fn test_get_wrong_owner_is_not_found(store: &dyn JobStore) -> Result<(), StoreError> {
    let job = store
        .enqueue(Job::enqueue(owner(), JobKind::PdfGeneration, HashMap::new()))
        .await?;
    let err = store.get(&stranger(), &job.id).await.unwrap_err();
    assert!(
        matches!(err, StoreError::NotFound(_)),
        "cross-owner get must be NotFound, got {err:?}"
    );
    Ok(())
}

async fn test_inline_lifecycle(store: &dyn JobStore) -> Result<(), StoreError> {
    let job = store
        .enqueue(Job::enqueue(owner(), JobKind::EmailDelivery, HashMap::new()))
        .await?;
    store.start(&job.id).await?;
    store.advance_progress(&job.id, 40).await?;
    let done = store
        .succeed(&job.id, HashMap::from([("sent".into(), serde_json::json!(true))]))
        .await?;
    assert_eq!(done.status, JobStatus::Succeeded);
    assert_eq!(done.progress, 100, "succeed must pin progress to 100");
    assert!(done.result.contains_key("sent"));
    Ok(())
}

async fn test_claim_next_takes_queued(store: &dyn JobStore) -> Result<(), StoreError> {
    let job = store
        .enqueue(Job::enqueue(owner(), JobKind::FileScan, HashMap::new()))
        .await?;
    let claimed = store
        .claim_next(JobKind::FileScan)
        .await?
        .expect("a queued file_scan job should be claimable");
    assert_eq!(claimed.status, JobStatus::Running);

    // The same job cannot be claimed twice.
    if let Some(second) = store.claim_next(JobKind::FileScan).await? {
        assert_ne!(second.id, job.id, "a job must be claimed at most once");
    }
    Ok(())
}

async fn test_claim_next_empty_kind(store: &dyn JobStore) -> Result<(), StoreError> {
    // Drain anything earlier tests left queued for this kind.
    while let Some(job) = store.claim_next(JobKind::DraftGeneration).await? {
        store.fail(&job.id, "conformance drain").await?;
    }

    let job = store
        .enqueue(Job::enqueue(owner(), JobKind::DraftGeneration, HashMap::new()))
        .await?;
    store.start(&job.id).await?;
    let claimed = store.claim_next(JobKind::DraftGeneration).await?;
    assert!(
        claimed.is_none(),
        "claim_next must skip jobs that are already running"
    );
    store.fail(&job.id, "conformance cleanup").await?;
    Ok(())
}

async fn test_terminal_jobs_reject_mutation(store: &dyn JobStore) -> Result<(), StoreError> {
    let job = store
        .enqueue(Job::enqueue(owner(), JobKind::PdfGeneration, HashMap::new()))
        .await?;
    store.start(&job.id).await?;
    store.fail(&job.id, "boom").await?;

    let err = store.advance_progress(&job.id, 50).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
    let err = store.succeed(&job.id, HashMap::new()).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));

    let fetched = store.get(&owner(), &job.id).await?;
    assert_eq!(fetched.status, JobStatus::Failed);
    assert_eq!(fetched.error.as_deref(), Some("boom"));
    Ok(())
}

/// Run the full claim store conformance test suite.
///
/// # Errors
///
/// Returns an error if any conformance test fails.
pub async fn run_claim_store_conformance_tests(store: &dyn ClaimStore) -> Result<(), StoreError> {
    test_create_then_get(store).await?;
    test_claim_wrong_owner_is_not_found(store).await?;
    test_patch_leaves_unset_fields(store).await?;
    test_finalize(store).await?;
    test_draft_roundtrip(store).await?;
    test_list_pages_newest_first(store).await?;
    Ok(())
}

async fn test_create_then_get(store: &dyn ClaimStore) -> Result<(), StoreError> {
    let claim = store.create(Claim::new(owner(), ClaimType::Auto)).await?;
    let fetched = store.get(&owner(), &claim.id).await?;
    assert_eq!(fetched.id, claim.id);
    Ok(())
}

async fn test_claim_wrong_owner_is_not_found(store: &dyn ClaimStore) -> Result<(), StoreError> {
    let claim = store.create(Claim::new(owner(), ClaimType::Home)).await?;
    let err = store.get(&stranger(), &claim.id).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    Ok(())
}

async fn test_patch_leaves_unset_fields(store: &dyn ClaimStore) -> Result<(), StoreError> {
    let claim = store
        .create(
            Claim::new(owner(), ClaimType::Auto)
                .with_policy_number("P-111111")
                .with_incident_description("rear-ended at a light"),
        )
        .await?;

    let patch = ClaimPatch {
        incident_location: Some("Main St".into()),
        ..ClaimPatch::default()
    };
    let updated = store.update(&owner(), &claim.id, patch).await?;
    assert_eq!(updated.incident_location.as_deref(), Some("Main St"));
    assert_eq!(
        updated.policy_number.as_deref(),
        Some("P-111111"),
        "unset patch fields must be preserved"
    );
    Ok(())
}

async fn test_finalize(store: &dyn ClaimStore) -> Result<(), StoreError> {
    let claim = store.create(Claim::new(owner(), ClaimType::Travel)).await?;
    let finalized = store.finalize(&owner(), &claim.id).await?;
    assert_eq!(finalized.status.as_str(), "finalized");
    Ok(())
}

async fn test_draft_roundtrip(store: &dyn ClaimStore) -> Result<(), StoreError> {
    let claim = store.create(Claim::new(owner(), ClaimType::Health)).await?;
    assert!(store.draft(&claim.id).await?.is_none());

    store
        .save_draft(ClaimDraft {
            claim_id: claim.id.clone(),
            content: serde_json::json!({"summary": "test"}),
            confidence: 0.8,
            issues: vec![],
        })
        .await?;

    let draft = store.draft(&claim.id).await?.expect("draft should exist");
    assert!((draft.confidence - 0.8).abs() < f64::EPSILON);
    Ok(())
}

async fn test_list_pages_newest_first(store: &dyn ClaimStore) -> Result<(), StoreError> {
    let pager = UserId::from("conformance-pager");
    let mut ids = Vec::new();
    for _ in 0..5 {
        let claim = store.create(Claim::new(pager.clone(), ClaimType::Other)).await?;
        ids.push(claim.id);
    }

    let filter = ClaimFilter {
        limit: PageLimit::new(2).expect("2 is within bounds"),
        ..ClaimFilter::default()
    };
    let first = store.list(&pager, filter).await?;
    assert_eq!(first.items.len(), 2);
    let after = first.next_after.expect("more pages should remain");

    let filter = ClaimFilter {
        limit: PageLimit::new(10).expect("10 is within bounds"),
        after: Some(after),
        ..ClaimFilter::default()
    };
    let rest = store.list(&pager, filter).await?;
    assert_eq!(rest.items.len(), 3);
    assert!(rest.next_after.is_none());

    // No overlap between pages.
    for item in &rest.items {
        assert!(!first.items.iter().any(|c| c.id == item.id));
    }
    Ok(())
}

/// Run the idempotency store conformance test suite.
///
/// # Errors
///
/// Returns an error if any conformance test fails.
pub async fn run_idempotency_conformance_tests(
    store: &dyn IdempotencyStore,
) -> Result<(), StoreError> {
    test_execute_then_replay(store).await?;
    test_waiter_receives_published_value(store).await?;
    test_abandon_releases_waiters(store).await?;
    Ok(())
}

async fn test_execute_then_replay(store: &dyn IdempotencyStore) -> Result<(), StoreError> {
    let caller = owner();
    let outcome = store.begin(&caller, "idem-1").await?;
    assert!(matches!(outcome, Begin::Execute), "first begin should execute");

    store
        .complete(&caller, "idem-1", serde_json::json!({"id": "clm_1"}))
        .await?;

    match store.begin(&caller, "idem-1").await? {
        Begin::Replay(value) => assert_eq!(value["id"], "clm_1"),
        other => panic!("expected replay after complete, got {other:?}"),
    }

    // A different caller reusing the same key is a distinct slot.
    let outcome = store.begin(&stranger(), "idem-1").await?;
    assert!(matches!(outcome, Begin::Execute));
    Ok(())
}

async fn test_waiter_receives_published_value(
    store: &dyn IdempotencyStore,
) -> Result<(), StoreError> {
    let caller = owner();
    let outcome = store.begin(&caller, "idem-2").await?;
    assert!(matches!(outcome, Begin::Execute));

    let Begin::Wait(mut rx) = store.begin(&caller, "idem-2").await? else {
        panic!("second concurrent begin should wait");
    };

    store
        .complete(&caller, "idem-2", serde_json::json!({"ok": true}))
        .await?;

    rx.changed().await.expect("publisher should notify waiters");
    let value = rx.borrow().clone().expect("a value should be published");
    assert_eq!(value["ok"], true);
    Ok(())
}

async fn test_abandon_releases_waiters(store: &dyn IdempotencyStore) -> Result<(), StoreError> {
    let caller = owner();
    let outcome = store.begin(&caller, "idem-3").await?;
    assert!(matches!(outcome, Begin::Execute));

    let Begin::Wait(mut rx) = store.begin(&caller, "idem-3").await? else {
        panic!("second concurrent begin should wait");
    };

    store.abandon(&caller, "idem-3").await?;

    // The channel closes without a value; the waiter retries begin and wins.
    assert!(rx.changed().await.is_err() || rx.borrow().is_none());
    let outcome = store.begin(&caller, "idem-3").await?;
    assert!(
        matches!(outcome, Begin::Execute),
        "slot should be free again after abandon"
    );
    Ok(())
}
