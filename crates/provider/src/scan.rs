use async_trait::async_trait;
use tracing::info;

use claimdesk_core::{FileRecord, ScanVerdict};

use crate::error::ProviderError;

/// Virus-scanning collaborator.
#[async_trait]
pub trait VirusScanner: Send + Sync {
    /// Scan the uploaded bytes for the given file record.
    async fn scan(&self, file: &FileRecord) -> Result<ScanVerdict, ProviderError>;
}

/// Scanner for local development that reports every file as clean.
#[derive(Debug, Default)]
pub struct AlwaysCleanScanner;

impl AlwaysCleanScanner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl VirusScanner for AlwaysCleanScanner {
    async fn scan(&self, file: &FileRecord) -> Result<ScanVerdict, ProviderError> {
        info!(file_id = %file.id, "local scanner verdict: clean");
        Ok(ScanVerdict::Clean)
    }
}

#[cfg(test)]
mod tests {
    use claimdesk_core::FilePurpose;

    use super::*;

    #[tokio::test]
    async fn local_scanner_is_always_clean() {
        let scanner = AlwaysCleanScanner::new();
        let file = FileRecord::new("u1", FilePurpose::PolicyPdf, "application/pdf");
        assert_eq!(scanner.scan(&file).await.unwrap(), ScanVerdict::Clean);
    }
}
