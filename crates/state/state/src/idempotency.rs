use async_trait::async_trait;
use tokio::sync::watch;

use claimdesk_core::UserId;

use crate::error::StoreError;

/// Outcome of [`IdempotencyStore::begin`] for a (caller, key) pair.
#[derive(Debug)]
pub enum Begin {
    /// No record exists; the caller owns the side effect and must follow up
    /// with `complete` or `abandon`.
    Execute,
    /// Another request with the same key is in flight. Await the receiver:
    /// `Some(value)` is the first caller's published response; the channel
    /// closing without a value means the first caller abandoned and the
    /// waiter should call `begin` again.
    Wait(watch::Receiver<Option<serde_json::Value>>),
    /// A response was already recorded for this key; return it as-is.
    Replay(serde_json::Value),
}

/// Deduplicates side-effecting requests keyed by (caller, client-supplied key).
///
/// The store is not content-addressed: it trusts the caller to reuse a key
/// only for logically identical retries. `begin` must be atomic per key so
/// that two concurrent requests cannot both observe `Execute` — the losing
/// request gets `Wait` and receives the winner's response. Entries never
/// expire; eviction is out of scope.
#[async_trait]
pub trait IdempotencyStore: Send + Sync {
    /// Atomically look up or reserve the (caller, key) slot.
    async fn begin(&self, owner: &UserId, key: &str) -> Result<Begin, StoreError>;

    /// Publish the response for a slot previously reserved with `Execute`.
    async fn complete(
        &self,
        owner: &UserId,
        key: &str,
        value: serde_json::Value,
    ) -> Result<(), StoreError>;

    /// Release a reserved slot without a response so retries can run.
    async fn abandon(&self, owner: &UserId, key: &str) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Verify object safety.
    fn _assert_dyn_idempotency_store(_: &dyn IdempotencyStore) {}
}
