use async_trait::async_trait;
use tracing::info;

use claimdesk_core::Claim;

use crate::error::ProviderError;

/// Email-delivery collaborator.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send the claim summary to the recipient, or to the claim owner's
    /// address of record when no recipient is given.
    async fn send_claim(&self, claim: &Claim, recipient: Option<&str>)
    -> Result<(), ProviderError>;
}

/// Mailer that logs the delivery and reports success without external I/O.
///
/// Useful for local development and tests where no mail transport exists.
#[derive(Debug, Default)]
pub struct LogMailer;

impl LogMailer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_claim(
        &self,
        claim: &Claim,
        recipient: Option<&str>,
    ) -> Result<(), ProviderError> {
        info!(
            claim_id = %claim.id,
            recipient = recipient.unwrap_or("<owner address>"),
            "log mailer delivered claim email"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use claimdesk_core::ClaimType;

    use super::*;

    #[tokio::test]
    async fn log_mailer_always_succeeds() {
        let mailer = LogMailer::new();
        let claim = Claim::new("u1", ClaimType::Travel);
        assert!(mailer.send_claim(&claim, None).await.is_ok());
    }
}
