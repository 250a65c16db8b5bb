use claimdesk_core::{ClaimId, ClaimdeskError, UserId};

/// Forwards finalized claims to the insurer.
///
/// This is a stub boundary: the downstream submission protocol is not part
/// of this system, so every call reports the capability as unimplemented.
#[derive(Debug, Default)]
pub struct SubmissionService;

impl SubmissionService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Submit a claim to its insurer.
    pub async fn submit(
        &self,
        _caller: &UserId,
        _claim_id: &ClaimId,
    ) -> Result<serde_json::Value, ClaimdeskError> {
        Err(ClaimdeskError::NotImplemented(
            "claim submission".to_owned(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn submit_is_not_implemented() {
        let svc = SubmissionService::new();
        let err = svc
            .submit(&UserId::from("u1"), &ClaimId::from("clm_1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimdeskError::NotImplemented(_)));
    }
}
