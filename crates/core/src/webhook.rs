use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{UserId, WebhookId, prefixed_id};

/// An outgoing webhook registration: a caller-supplied URL to notify.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Webhook {
    /// Registration identifier.
    pub id: WebhookId,
    /// Caller that registered the webhook.
    pub owner: UserId,
    /// Destination URL.
    pub url: String,
    /// Timestamp when the webhook was registered.
    pub created_at: DateTime<Utc>,
}

impl Webhook {
    #[must_use]
    pub fn new(owner: impl Into<UserId>, url: impl Into<String>) -> Self {
        Self {
            id: WebhookId::new(prefixed_id("wh")),
            owner: owner.into(),
            url: url.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webhook_construction() {
        let hook = Webhook::new("user-1", "https://example.com/cb");
        assert!(hook.id.as_str().starts_with("wh_"));
        assert_eq!(hook.url, "https://example.com/cb");
    }
}
