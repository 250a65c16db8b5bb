use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! newtype_string {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
        #[cfg_attr(feature = "openapi", schema(value_type = String))]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new instance from a string value.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Return the inner string as a str slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

newtype_string!(UserId, "Identifies the caller that owns a record.");
newtype_string!(ClaimId, "A unique claim identifier.");
newtype_string!(FileId, "A unique file attachment identifier.");
newtype_string!(JobId, "A unique background job identifier.");
newtype_string!(InsurerId, "Identifies an insurance provider directory entry.");
newtype_string!(WebhookId, "A unique outgoing webhook registration identifier.");

/// Generate a prefixed identifier, e.g. `clm_550e8400...`.
#[must_use]
pub fn prefixed_id(prefix: &str) -> String {
    format!("{prefix}_{}", uuid::Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newtype_from_str() {
        let id = ClaimId::from("clm_1");
        assert_eq!(id.as_str(), "clm_1");
        assert_eq!(&*id, "clm_1");
    }

    #[test]
    fn newtype_from_string() {
        let user = UserId::from("user-42".to_string());
        assert_eq!(user.to_string(), "user-42");
    }

    #[test]
    fn newtype_serde_transparent() {
        let id = JobId::new("job_abc");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"job_abc\"");
        let back: JobId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn prefixed_ids_are_unique() {
        let a = prefixed_id("clm");
        let b = prefixed_id("clm");
        assert!(a.starts_with("clm_"));
        assert_ne!(a, b);
    }
}
