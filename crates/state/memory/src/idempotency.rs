use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::watch;

use claimdesk_core::UserId;
use claimdesk_state::error::StoreError;
use claimdesk_state::idempotency::{Begin, IdempotencyStore};

/// One reservation slot for a (caller, key) pair.
#[derive(Debug)]
enum Slot {
    /// The first caller is executing; waiters hold clones of `rx`.
    Pending {
        tx: watch::Sender<Option<serde_json::Value>>,
        rx: watch::Receiver<Option<serde_json::Value>>,
    },
    /// A response has been recorded and is replayed to every retry.
    Done(serde_json::Value),
}

/// In-memory single-flight [`IdempotencyStore`] backed by a [`DashMap`].
///
/// `begin` reserves the slot through the map's `entry` API, so the
/// check-then-reserve step is atomic per key: concurrent requests with the
/// same (caller, key) resolve to exactly one `Execute` and the rest `Wait`.
/// Entries are never evicted.
#[derive(Debug, Default)]
pub struct MemoryIdempotencyStore {
    slots: DashMap<String, Slot>,
}

impl MemoryIdempotencyStore {
    /// Create a new, empty in-memory idempotency store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_key(owner: &UserId, key: &str) -> String {
        // Unit separator keeps (owner, key) pairs collision-free.
        format!("{owner}\u{1f}{key}")
    }
}

#[async_trait]
impl IdempotencyStore for MemoryIdempotencyStore {
    async fn begin(&self, owner: &UserId, key: &str) -> Result<Begin, StoreError> {
        let slot_key = Self::slot_key(owner, key);

        let outcome = match self.slots.entry(slot_key) {
            dashmap::mapref::entry::Entry::Occupied(occupied) => match occupied.get() {
                Slot::Done(value) => Begin::Replay(value.clone()),
                Slot::Pending { rx, .. } => Begin::Wait(rx.clone()),
            },
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                let (tx, rx) = watch::channel(None);
                vacant.insert(Slot::Pending { tx, rx });
                Begin::Execute
            }
        };

        Ok(outcome)
    }

    async fn complete(
        &self,
        owner: &UserId,
        key: &str,
        value: serde_json::Value,
    ) -> Result<(), StoreError> {
        let slot_key = Self::slot_key(owner, key);
        let mut entry = self.slots.get_mut(&slot_key).ok_or_else(|| {
            StoreError::Conflict("complete without a matching begin".to_owned())
        })?;

        let previous = std::mem::replace(&mut *entry, Slot::Done(value.clone()));
        drop(entry);

        if let Slot::Pending { tx, rx } = previous {
            // The waiters' receiver clones outlive `rx`, so the send reaches
            // them even though our own handle is about to drop.
            let _ = tx.send(Some(value));
            drop(rx);
        }

        Ok(())
    }

    async fn abandon(&self, owner: &UserId, key: &str) -> Result<(), StoreError> {
        let slot_key = Self::slot_key(owner, key);
        // Dropping the sender closes the channel; waiters retry begin.
        self.slots.remove(&slot_key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use claimdesk_state::testing::run_idempotency_conformance_tests;

    use super::*;

    #[tokio::test]
    async fn conformance() {
        let store = MemoryIdempotencyStore::new();
        run_idempotency_conformance_tests(&store)
            .await
            .expect("conformance tests should pass");
    }

    #[tokio::test]
    async fn concurrent_begin_elects_one_executor() {
        let store = Arc::new(MemoryIdempotencyStore::new());
        let owner = UserId::from("u1");

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            let owner = owner.clone();
            handles.push(tokio::spawn(async move {
                store.begin(&owner, "create-claim").await.unwrap()
            }));
        }

        let mut executors = 0;
        let mut waiters = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Begin::Execute => executors += 1,
                Begin::Wait(_) => waiters += 1,
                Begin::Replay(_) => panic!("nothing was completed yet"),
            }
        }
        assert_eq!(executors, 1, "exactly one request may execute");
        assert_eq!(waiters, 7);
    }

    #[tokio::test]
    async fn keys_are_scoped_per_caller() {
        let store = MemoryIdempotencyStore::new();
        let a = UserId::from("alice");
        let b = UserId::from("bob");

        assert!(matches!(store.begin(&a, "k").await.unwrap(), Begin::Execute));
        assert!(matches!(store.begin(&b, "k").await.unwrap(), Begin::Execute));
    }

    #[tokio::test]
    async fn complete_without_begin_is_conflict() {
        let store = MemoryIdempotencyStore::new();
        let err = store
            .complete(&UserId::from("u1"), "never-begun", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }
}
