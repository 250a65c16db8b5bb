use async_trait::async_trait;

use claimdesk_core::FileRecord;

use crate::error::ProviderError;

/// Text-extraction (OCR) collaborator, run after a clean scan.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract text from the uploaded bytes, if any can be found.
    async fn extract_text(&self, file: &FileRecord) -> Result<Option<String>, ProviderError>;
}

/// Extractor for local development that never finds text.
#[derive(Debug, Default)]
pub struct NoopTextExtractor;

impl NoopTextExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractor for NoopTextExtractor {
    async fn extract_text(&self, _file: &FileRecord) -> Result<Option<String>, ProviderError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use claimdesk_core::FilePurpose;

    use super::*;

    #[tokio::test]
    async fn noop_extractor_finds_nothing() {
        let extractor = NoopTextExtractor::new();
        let file = FileRecord::new("u1", FilePurpose::IncidentImage, "image/jpeg");
        assert!(extractor.extract_text(&file).await.unwrap().is_none());
    }
}
