use async_trait::async_trait;
use dashmap::DashMap;

use claimdesk_core::{UserId, Webhook};
use claimdesk_state::error::StoreError;
use claimdesk_state::store::WebhookStore;

/// In-memory [`WebhookStore`] keyed by owner.
#[derive(Debug, Default)]
pub struct MemoryWebhookStore {
    hooks: DashMap<String, Vec<Webhook>>,
}

impl MemoryWebhookStore {
    /// Create a new, empty in-memory webhook store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WebhookStore for MemoryWebhookStore {
    async fn register(&self, webhook: Webhook) -> Result<Webhook, StoreError> {
        self.hooks
            .entry(webhook.owner.to_string())
            .or_default()
            .push(webhook.clone());
        Ok(webhook)
    }

    async fn list(&self, owner: &UserId) -> Result<Vec<Webhook>, StoreError> {
        Ok(self
            .hooks
            .get(owner.as_str())
            .map(|hooks| hooks.value().clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn register_and_list_per_owner() {
        let store = MemoryWebhookStore::new();
        store
            .register(Webhook::new("u1", "https://a.example/cb"))
            .await
            .unwrap();
        store
            .register(Webhook::new("u1", "https://b.example/cb"))
            .await
            .unwrap();
        store
            .register(Webhook::new("u2", "https://c.example/cb"))
            .await
            .unwrap();

        let mine = store.list(&UserId::from("u1")).await.unwrap();
        assert_eq!(mine.len(), 2);
        let theirs = store.list(&UserId::from("u2")).await.unwrap();
        assert_eq!(theirs.len(), 1);
        assert!(store.list(&UserId::from("u3")).await.unwrap().is_empty());
    }
}
