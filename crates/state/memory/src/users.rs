use async_trait::async_trait;
use dashmap::DashMap;

use claimdesk_core::{Caller, UserId};
use claimdesk_state::error::StoreError;
use claimdesk_state::store::UserStore;

/// In-memory [`UserStore`] backed by a [`DashMap`].
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: DashMap<String, Caller>,
}

impl MemoryUserStore {
    /// Create a new, empty in-memory user store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn upsert(&self, caller: Caller) -> Result<Caller, StoreError> {
        self.users.insert(caller.id.to_string(), caller.clone());
        Ok(caller)
    }

    async fn get(&self, id: &UserId) -> Result<Option<Caller>, StoreError> {
        Ok(self.users.get(id.as_str()).map(|caller| caller.value().clone()))
    }
}
