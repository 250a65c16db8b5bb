use thiserror::Error;

use claimdesk_core::ClaimdeskError;

/// Errors that can occur during provider operations.
///
/// No retry policy is applied on top of these; a failure surfaces directly
/// to the caller as upstream unavailability.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The downstream service could not be reached or returned a failure.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The provider was given invalid configuration.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A serialization or deserialization error occurred.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<ProviderError> for ClaimdeskError {
    fn from(err: ProviderError) -> Self {
        Self::Unavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_to_unavailable() {
        let err: ClaimdeskError = ProviderError::Unavailable("smtp down".into()).into();
        assert!(matches!(err, ClaimdeskError::Unavailable(_)));
    }
}
