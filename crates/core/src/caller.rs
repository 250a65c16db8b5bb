use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// The resolved identity of the caller making a request.
///
/// Derived once per request from a verified bearer token and passed down to
/// every operation that needs an ownership check. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    /// Stable caller identifier (the token's `sub` claim).
    pub id: UserId,
    /// Email address, when the token carries one.
    pub email: Option<String>,
}

impl Caller {
    #[must_use]
    pub fn new(id: impl Into<UserId>, email: Option<String>) -> Self {
        Self {
            id: id.into(),
            email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_construction() {
        let caller = Caller::new("user-1", Some("a@example.com".into()));
        assert_eq!(caller.id.as_str(), "user-1");
        assert_eq!(caller.email.as_deref(), Some("a@example.com"));
    }
}
