use async_trait::async_trait;
use dashmap::DashMap;

use claimdesk_core::{FileId, FileRecord, FileStatus, ScanVerdict, UserId};
use claimdesk_state::error::StoreError;
use claimdesk_state::store::FileStore;

/// In-memory [`FileStore`] backed by a [`DashMap`].
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    files: DashMap<String, FileRecord>,
}

impl MemoryFileStore {
    /// Create a new, empty in-memory file store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn create(&self, file: FileRecord) -> Result<FileRecord, StoreError> {
        self.files.insert(file.id.to_string(), file.clone());
        Ok(file)
    }

    async fn get(&self, owner: &UserId, id: &FileId) -> Result<FileRecord, StoreError> {
        self.files
            .get(id.as_str())
            .filter(|file| file.owner == *owner)
            .map(|file| file.value().clone())
            .ok_or(StoreError::NotFound("file"))
    }

    async fn set_status(&self, id: &FileId, status: FileStatus) -> Result<FileRecord, StoreError> {
        let mut entry = self
            .files
            .get_mut(id.as_str())
            .ok_or(StoreError::NotFound("file"))?;
        entry.status = status;
        Ok(entry.clone())
    }

    async fn record_scan(
        &self,
        id: &FileId,
        verdict: ScanVerdict,
        ocr_text: Option<String>,
    ) -> Result<FileRecord, StoreError> {
        let mut entry = self
            .files
            .get_mut(id.as_str())
            .ok_or(StoreError::NotFound("file"))?;
        entry.virus_scan = verdict;
        entry.ocr_text = ocr_text;
        // Only a clean verdict makes the file usable.
        entry.status = if verdict == ScanVerdict::Clean {
            FileStatus::Ready
        } else {
            FileStatus::Failed
        };
        Ok(entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use claimdesk_core::FilePurpose;

    use super::*;

    fn pending_file(owner: &str) -> FileRecord {
        FileRecord::new(owner, FilePurpose::IncidentImage, "image/png")
    }

    #[tokio::test]
    async fn create_then_get() {
        let store = MemoryFileStore::new();
        let owner = UserId::from("u1");
        let file = store.create(pending_file("u1")).await.unwrap();
        let fetched = store.get(&owner, &file.id).await.unwrap();
        assert_eq!(fetched.status, FileStatus::Pending);
        assert_eq!(fetched.virus_scan, ScanVerdict::Unknown);
    }

    #[tokio::test]
    async fn cross_owner_get_is_not_found() {
        let store = MemoryFileStore::new();
        let file = store.create(pending_file("u1")).await.unwrap();
        let err = store.get(&UserId::from("u2"), &file.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound("file")));
    }

    #[tokio::test]
    async fn clean_scan_makes_file_ready() {
        let store = MemoryFileStore::new();
        let file = store.create(pending_file("u1")).await.unwrap();
        store.set_status(&file.id, FileStatus::Scanning).await.unwrap();

        let scanned = store
            .record_scan(&file.id, ScanVerdict::Clean, Some("extracted".into()))
            .await
            .unwrap();
        assert_eq!(scanned.status, FileStatus::Ready);
        assert_eq!(scanned.ocr_text.as_deref(), Some("extracted"));
    }

    #[tokio::test]
    async fn infected_scan_fails_the_file() {
        let store = MemoryFileStore::new();
        let file = store.create(pending_file("u1")).await.unwrap();

        let scanned = store
            .record_scan(&file.id, ScanVerdict::Infected, None)
            .await
            .unwrap();
        assert_eq!(scanned.status, FileStatus::Failed);
        assert_eq!(scanned.virus_scan, ScanVerdict::Infected);
    }
}
