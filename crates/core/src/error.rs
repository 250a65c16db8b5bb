use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A field-level validation failure attached to a [`ClaimdeskError::ValidationFailed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    /// Dotted path to the offending field (e.g. `policy_number`).
    pub field: String,
    /// Human-readable description of what is wrong with the value.
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Top-level error taxonomy for the claimdesk system.
///
/// Every failure a domain operation can produce maps onto exactly one of
/// these kinds; the HTTP boundary translates them into structured-problem
/// responses in one place. Missing entities and entities owned by a
/// different caller both surface as [`NotFound`](Self::NotFound) so the API
/// never leaks existence.
#[derive(Debug, Error)]
pub enum ClaimdeskError {
    /// Missing, malformed, expired, or otherwise unverifiable credentials.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// The entity does not exist or belongs to a different caller.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Input failed validation; carries field-level detail.
    #[error("validation failed")]
    ValidationFailed(Vec<FieldError>),

    /// The operation conflicts with the entity's current state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A downstream collaborator is unavailable.
    #[error("upstream unavailable: {0}")]
    Unavailable(String),

    /// The capability is a stub boundary and intentionally unimplemented.
    #[error("not implemented: {0}")]
    NotImplemented(String),
}

impl ClaimdeskError {
    /// Shorthand for a single-field validation failure.
    #[must_use]
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationFailed(vec![FieldError::new(field, message)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_names_entity() {
        let err = ClaimdeskError::NotFound("claim");
        assert_eq!(err.to_string(), "claim not found");
    }

    #[test]
    fn invalid_carries_field_detail() {
        let err = ClaimdeskError::invalid("cursor", "not valid base64");
        match err {
            ClaimdeskError::ValidationFailed(fields) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].field, "cursor");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
