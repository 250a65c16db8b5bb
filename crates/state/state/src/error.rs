use thiserror::Error;

use claimdesk_core::ClaimdeskError;

/// Errors produced by entity store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The entity does not exist or belongs to a different caller.
    ///
    /// Stores never distinguish the two cases; ownership mismatches must not
    /// be observable through error shape.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The mutation conflicts with the entity's current lifecycle state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A value could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The backend itself failed (connection loss, timeout).
    #[error("backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for ClaimdeskError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(entity) => Self::NotFound(entity),
            StoreError::Conflict(msg) => Self::Conflict(msg),
            StoreError::Serialization(msg) | StoreError::Backend(msg) => Self::Unavailable(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_domain_not_found() {
        let err: ClaimdeskError = StoreError::NotFound("claim").into();
        assert!(matches!(err, ClaimdeskError::NotFound("claim")));
    }

    #[test]
    fn backend_maps_to_unavailable() {
        let err: ClaimdeskError = StoreError::Backend("connection reset".into()).into();
        assert!(matches!(err, ClaimdeskError::Unavailable(_)));
    }
}
