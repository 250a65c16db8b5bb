use claimdesk_core::{Caller, UserId};

/// Identity resolved from a verified bearer token, attached to the request
/// as an extension by the auth middleware.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    /// Stable caller identifier (the token's `sub` claim).
    pub id: String,
    /// Email address, when the token carries one.
    pub email: Option<String>,
}

impl CallerIdentity {
    /// The caller id as the domain newtype.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        UserId::from(self.id.as_str())
    }

    /// Convert into the domain caller value.
    #[must_use]
    pub fn to_caller(&self) -> Caller {
        Caller::new(self.id.as_str(), self.email.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_preserves_fields() {
        let identity = CallerIdentity {
            id: "user-1".into(),
            email: Some("a@example.com".into()),
        };
        let caller = identity.to_caller();
        assert_eq!(caller.id.as_str(), "user-1");
        assert_eq!(caller.email.as_deref(), Some("a@example.com"));
    }
}
