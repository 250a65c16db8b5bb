use std::collections::HashMap;

use async_trait::async_trait;

use claimdesk_core::FileRecord;

use crate::error::ProviderError;

/// A write location issued for a two-phase upload.
#[derive(Debug, Clone)]
pub struct UploadSlot {
    /// URL the client uploads the bytes to.
    pub url: String,
    /// Headers the client must send with the upload.
    pub headers: HashMap<String, String>,
}

/// Object-storage collaborator: issues upload slots for file bytes.
///
/// The bytes themselves never pass through this service; only metadata does.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Issue a write location for the given pending file record.
    async fn create_upload_slot(&self, file: &FileRecord) -> Result<UploadSlot, ProviderError>;
}

/// Local object store that fabricates bucket-relative upload URLs.
#[derive(Debug)]
pub struct LocalObjectStore {
    base_url: String,
    bucket: String,
}

impl LocalObjectStore {
    #[must_use]
    pub fn new(base_url: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn create_upload_slot(&self, file: &FileRecord) -> Result<UploadSlot, ProviderError> {
        let url = format!("{}/{}/{}", self.base_url, self.bucket, file.id);
        Ok(UploadSlot {
            url,
            headers: HashMap::from([("x-up".to_owned(), "1".to_owned())]),
        })
    }
}

#[cfg(test)]
mod tests {
    use claimdesk_core::FilePurpose;

    use super::*;

    #[tokio::test]
    async fn slot_url_contains_bucket_and_file_id() {
        let store = LocalObjectStore::new("https://storage.local", "claim-uploads");
        let file = FileRecord::new("u1", FilePurpose::IncidentImage, "image/png");

        let slot = store.create_upload_slot(&file).await.unwrap();
        assert_eq!(
            slot.url,
            format!("https://storage.local/claim-uploads/{}", file.id)
        );
        assert_eq!(slot.headers.get("x-up").map(String::as_str), Some("1"));
    }
}
