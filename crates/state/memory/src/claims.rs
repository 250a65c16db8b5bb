use async_trait::async_trait;
use dashmap::DashMap;

use claimdesk_core::{Claim, ClaimDraft, ClaimId, ClaimStatus, UserId};
use claimdesk_state::error::StoreError;
use claimdesk_state::store::{ClaimFilter, ClaimPage, ClaimPatch, ClaimStore};

/// In-memory [`ClaimStore`] backed by [`DashMap`]s.
///
/// Claims and their drafts live in separate maps keyed by claim id; there is
/// no cross-map transaction, matching the storage contract.
#[derive(Debug, Default)]
pub struct MemoryClaimStore {
    claims: DashMap<String, Claim>,
    drafts: DashMap<String, ClaimDraft>,
}

impl MemoryClaimStore {
    /// Create a new, empty in-memory claim store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn owned(&self, owner: &UserId, id: &ClaimId) -> Result<Claim, StoreError> {
        self.claims
            .get(id.as_str())
            .filter(|claim| claim.owner == *owner)
            .map(|claim| claim.value().clone())
            .ok_or(StoreError::NotFound("claim"))
    }
}

fn apply_patch(claim: &mut Claim, patch: ClaimPatch) {
    if let Some(insurer_id) = patch.insurer_id {
        claim.insurer_id = Some(insurer_id);
    }
    if let Some(insurer_name) = patch.insurer_name {
        claim.insurer_name = Some(insurer_name);
    }
    if let Some(policy_number) = patch.policy_number {
        claim.policy_number = Some(policy_number);
    }
    if let Some(description) = patch.incident_description {
        claim.incident_description = Some(description);
    }
    if let Some(occurred_at) = patch.incident_occurred_at {
        claim.incident_occurred_at = Some(occurred_at);
    }
    if let Some(location) = patch.incident_location {
        claim.incident_location = Some(location);
    }
    if let Some(metadata) = patch.incident_metadata {
        claim.incident_metadata = metadata;
    }
    if let Some(attachments) = patch.attachments {
        claim.attachments = attachments;
    }
}

#[async_trait]
impl ClaimStore for MemoryClaimStore {
    async fn create(&self, claim: Claim) -> Result<Claim, StoreError> {
        self.claims.insert(claim.id.to_string(), claim.clone());
        Ok(claim)
    }

    async fn get(&self, owner: &UserId, id: &ClaimId) -> Result<Claim, StoreError> {
        self.owned(owner, id)
    }

    async fn update(
        &self,
        owner: &UserId,
        id: &ClaimId,
        patch: ClaimPatch,
    ) -> Result<Claim, StoreError> {
        let mut entry = self
            .claims
            .get_mut(id.as_str())
            .filter(|claim| claim.owner == *owner)
            .ok_or(StoreError::NotFound("claim"))?;
        apply_patch(&mut entry, patch);
        Ok(entry.clone())
    }

    async fn list(&self, owner: &UserId, filter: ClaimFilter) -> Result<ClaimPage, StoreError> {
        let mut items: Vec<Claim> = self
            .claims
            .iter()
            .filter(|entry| entry.owner == *owner)
            .filter(|entry| filter.status.is_none_or(|status| entry.status == status))
            .map(|entry| entry.value().clone())
            .collect();

        // Newest first; id as tiebreak so the order is total.
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_str().cmp(a.id.as_str()))
        });

        let start = match &filter.after {
            Some(after) => items
                .iter()
                .position(|claim| claim.id.as_str() == after)
                .map_or(items.len(), |pos| pos + 1),
            None => 0,
        };

        let limit = filter.limit.get();
        let page: Vec<Claim> = items.into_iter().skip(start).collect();
        let has_more = page.len() > limit;
        let items: Vec<Claim> = page.into_iter().take(limit).collect();
        let next_after = if has_more {
            items.last().map(|claim| claim.id.to_string())
        } else {
            None
        };

        Ok(ClaimPage { items, next_after })
    }

    async fn finalize(&self, owner: &UserId, id: &ClaimId) -> Result<Claim, StoreError> {
        let mut entry = self
            .claims
            .get_mut(id.as_str())
            .filter(|claim| claim.owner == *owner)
            .ok_or(StoreError::NotFound("claim"))?;
        entry.status = ClaimStatus::Finalized;
        Ok(entry.clone())
    }

    async fn save_draft(&self, draft: ClaimDraft) -> Result<(), StoreError> {
        self.drafts.insert(draft.claim_id.to_string(), draft);
        Ok(())
    }

    async fn draft(&self, id: &ClaimId) -> Result<Option<ClaimDraft>, StoreError> {
        Ok(self.drafts.get(id.as_str()).map(|draft| draft.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use claimdesk_core::ClaimType;
    use claimdesk_state::testing::run_claim_store_conformance_tests;

    use super::*;

    #[tokio::test]
    async fn conformance() {
        let store = MemoryClaimStore::new();
        run_claim_store_conformance_tests(&store)
            .await
            .expect("conformance tests should pass");
    }

    #[tokio::test]
    async fn status_filter_excludes_other_states() {
        let store = MemoryClaimStore::new();
        let owner = UserId::from("u1");
        let draft = store
            .create(Claim::new(owner.clone(), ClaimType::Auto))
            .await
            .unwrap();
        let finalized = store
            .create(Claim::new(owner.clone(), ClaimType::Auto))
            .await
            .unwrap();
        store.finalize(&owner, &finalized.id).await.unwrap();

        let page = store
            .list(
                &owner,
                ClaimFilter {
                    status: Some(ClaimStatus::Draft),
                    ..ClaimFilter::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, draft.id);
    }

    #[tokio::test]
    async fn unknown_cursor_yields_empty_page() {
        let store = MemoryClaimStore::new();
        let owner = UserId::from("u1");
        store
            .create(Claim::new(owner.clone(), ClaimType::Auto))
            .await
            .unwrap();

        let page = store
            .list(
                &owner,
                ClaimFilter {
                    after: Some("clm_does_not_exist".into()),
                    ..ClaimFilter::default()
                },
            )
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert!(page.next_after.is_none());
    }
}
