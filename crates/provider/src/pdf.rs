use async_trait::async_trait;

use claimdesk_core::{Claim, ClaimDraft};

use crate::error::ProviderError;

/// PDF-rendering collaborator: turns a claim (and its draft, when present)
/// into a stored document and returns its URL.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    /// Render the claim document and return its download URL.
    async fn render(
        &self,
        claim: &Claim,
        draft: Option<&ClaimDraft>,
    ) -> Result<String, ProviderError>;
}

/// Local renderer that fabricates a per-claim document URL without
/// producing bytes.
#[derive(Debug)]
pub struct LocalPdfRenderer {
    base_url: String,
}

impl LocalPdfRenderer {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PdfRenderer for LocalPdfRenderer {
    async fn render(
        &self,
        claim: &Claim,
        _draft: Option<&ClaimDraft>,
    ) -> Result<String, ProviderError> {
        Ok(format!("{}/pdfs/{}.pdf", self.base_url, claim.id))
    }
}

#[cfg(test)]
mod tests {
    use claimdesk_core::ClaimType;

    use super::*;

    #[tokio::test]
    async fn rendered_url_is_per_claim() {
        let renderer = LocalPdfRenderer::new("https://storage.local");
        let claim = Claim::new("u1", ClaimType::Auto);

        let url = renderer.render(&claim, None).await.unwrap();
        assert_eq!(url, format!("https://storage.local/pdfs/{}.pdf", claim.id));
    }
}
