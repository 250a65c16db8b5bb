use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use claimdesk_core::{
    ClaimdeskError, FileId, FilePurpose, FileRecord, FileStatus, Job, JobKind, ScanVerdict, UserId,
};
use claimdesk_provider::{ObjectStore, TextExtractor, UploadSlot, VirusScanner};
use claimdesk_state::store::{FileStore, JobStore};

/// Request to open a new upload slot.
#[derive(Debug, Clone)]
pub struct NewFileUpload {
    pub purpose: FilePurpose,
    pub content_type: String,
    pub filename: Option<String>,
    pub size: Option<u64>,
}

/// A pending file record together with its issued write location.
#[derive(Debug, Clone)]
pub struct UploadTicket {
    pub file: FileRecord,
    pub slot: UploadSlot,
}

/// Manages the two-phase upload: slot creation, then completion with an
/// inline virus-scan + OCR pipeline.
pub struct StorageService {
    files: Arc<dyn FileStore>,
    jobs: Arc<dyn JobStore>,
    object_store: Arc<dyn ObjectStore>,
    scanner: Arc<dyn VirusScanner>,
    extractor: Arc<dyn TextExtractor>,
}

impl StorageService {
    pub fn new(
        files: Arc<dyn FileStore>,
        jobs: Arc<dyn JobStore>,
        object_store: Arc<dyn ObjectStore>,
        scanner: Arc<dyn VirusScanner>,
        extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        Self {
            files,
            jobs,
            object_store,
            scanner,
            extractor,
        }
    }

    /// Phase one: record a pending file and issue a write location.
    pub async fn create_upload_slot(
        &self,
        caller: &UserId,
        upload: NewFileUpload,
    ) -> Result<UploadTicket, ClaimdeskError> {
        let mut file = FileRecord::new(caller.clone(), upload.purpose, upload.content_type);
        if let Some(filename) = upload.filename {
            file = file.with_filename(filename);
        }
        if let Some(size) = upload.size {
            file = file.with_size(size);
        }

        let file = self.files.create(file).await?;
        let slot = self
            .object_store
            .create_upload_slot(&file)
            .await
            .map_err(ClaimdeskError::from)?;

        info!(file_id = %file.id, "upload slot issued");
        Ok(UploadTicket { file, slot })
    }

    /// Phase two: the client finished uploading; scan the bytes and move the
    /// file to `Ready` or `Failed`.
    pub async fn complete_upload(
        &self,
        caller: &UserId,
        file_id: &FileId,
    ) -> Result<FileRecord, ClaimdeskError> {
        let file = self.files.get(caller, file_id).await?;
        if file.status != FileStatus::Pending && file.status != FileStatus::Uploaded {
            return Err(ClaimdeskError::Conflict(format!(
                "file {file_id} is not awaiting completion"
            )));
        }

        self.files.set_status(file_id, FileStatus::Scanning).await?;

        let job = self
            .jobs
            .enqueue(Job::enqueue(
                caller.clone(),
                JobKind::FileScan,
                HashMap::from([("file_id".to_owned(), serde_json::json!(file_id.as_str()))]),
            ))
            .await?;
        self.jobs.start(&job.id).await?;

        let verdict = match self.scanner.scan(&file).await {
            Ok(verdict) => verdict,
            Err(err) => {
                let err = ClaimdeskError::from(err);
                self.jobs.fail(&job.id, &err.to_string()).await?;
                self.files
                    .record_scan(file_id, ScanVerdict::Unknown, None)
                    .await?;
                return Err(err);
            }
        };
        self.jobs.advance_progress(&job.id, 50).await?;

        // OCR only runs over bytes that came back clean.
        let ocr_text = if verdict == ScanVerdict::Clean {
            self.extractor
                .extract_text(&file)
                .await
                .map_err(ClaimdeskError::from)?
        } else {
            None
        };

        let file = self.files.record_scan(file_id, verdict, ocr_text).await?;
        self.jobs
            .succeed(
                &job.id,
                HashMap::from([
                    ("file_id".to_owned(), serde_json::json!(file_id.as_str())),
                    ("verdict".to_owned(), serde_json::json!(verdict.as_str())),
                ]),
            )
            .await?;

        info!(file_id = %file_id, verdict = verdict.as_str(), "upload scan finished");
        Ok(file)
    }

    /// Fetch a file owned by the caller.
    pub async fn get_file(
        &self,
        caller: &UserId,
        file_id: &FileId,
    ) -> Result<FileRecord, ClaimdeskError> {
        Ok(self.files.get(caller, file_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use claimdesk_provider::{
        AlwaysCleanScanner, LocalObjectStore, NoopTextExtractor, ProviderError,
    };
    use claimdesk_state_memory::{MemoryFileStore, MemoryJobStore};

    use super::*;

    struct InfectedScanner;

    #[async_trait]
    impl VirusScanner for InfectedScanner {
        async fn scan(&self, _file: &FileRecord) -> Result<ScanVerdict, ProviderError> {
            Ok(ScanVerdict::Infected)
        }
    }

    struct FoundTextExtractor;

    #[async_trait]
    impl TextExtractor for FoundTextExtractor {
        async fn extract_text(
            &self,
            _file: &FileRecord,
        ) -> Result<Option<String>, ProviderError> {
            Ok(Some("POLICY NO 123456".to_owned()))
        }
    }

    fn service(
        files: Arc<MemoryFileStore>,
        jobs: Arc<MemoryJobStore>,
        scanner: Arc<dyn VirusScanner>,
        extractor: Arc<dyn TextExtractor>,
    ) -> StorageService {
        StorageService::new(
            files,
            jobs,
            Arc::new(LocalObjectStore::new("https://storage.local", "uploads")),
            scanner,
            extractor,
        )
    }

    fn upload() -> NewFileUpload {
        NewFileUpload {
            purpose: FilePurpose::PolicyPdf,
            content_type: "application/pdf".to_owned(),
            filename: Some("policy.pdf".to_owned()),
            size: Some(4096),
        }
    }

    #[tokio::test]
    async fn slot_then_complete_reaches_ready() {
        let files = Arc::new(MemoryFileStore::new());
        let jobs = Arc::new(MemoryJobStore::new());
        let owner = UserId::from("u1");
        let svc = service(
            Arc::clone(&files),
            Arc::clone(&jobs),
            Arc::new(AlwaysCleanScanner::new()),
            Arc::new(FoundTextExtractor),
        );

        let ticket = svc.create_upload_slot(&owner, upload()).await.unwrap();
        assert_eq!(ticket.file.status, FileStatus::Pending);
        assert!(ticket.slot.url.contains(ticket.file.id.as_str()));

        let done = svc.complete_upload(&owner, &ticket.file.id).await.unwrap();
        assert_eq!(done.status, FileStatus::Ready);
        assert_eq!(done.virus_scan, ScanVerdict::Clean);
        assert_eq!(done.ocr_text.as_deref(), Some("POLICY NO 123456"));
    }

    #[tokio::test]
    async fn infected_upload_fails_and_skips_ocr() {
        let files = Arc::new(MemoryFileStore::new());
        let jobs = Arc::new(MemoryJobStore::new());
        let owner = UserId::from("u1");
        let svc = service(
            Arc::clone(&files),
            Arc::clone(&jobs),
            Arc::new(InfectedScanner),
            Arc::new(FoundTextExtractor),
        );

        let ticket = svc.create_upload_slot(&owner, upload()).await.unwrap();
        let done = svc.complete_upload(&owner, &ticket.file.id).await.unwrap();
        assert_eq!(done.status, FileStatus::Failed);
        assert_eq!(done.virus_scan, ScanVerdict::Infected);
        assert!(done.ocr_text.is_none(), "no OCR over infected bytes");
    }

    #[tokio::test]
    async fn completing_twice_is_a_conflict() {
        let files = Arc::new(MemoryFileStore::new());
        let jobs = Arc::new(MemoryJobStore::new());
        let owner = UserId::from("u1");
        let svc = service(
            Arc::clone(&files),
            Arc::clone(&jobs),
            Arc::new(AlwaysCleanScanner::new()),
            Arc::new(NoopTextExtractor::new()),
        );

        let ticket = svc.create_upload_slot(&owner, upload()).await.unwrap();
        svc.complete_upload(&owner, &ticket.file.id).await.unwrap();
        let err = svc
            .complete_upload(&owner, &ticket.file.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimdeskError::Conflict(_)));
    }

    #[tokio::test]
    async fn scan_job_reaches_terminal_state() {
        let files = Arc::new(MemoryFileStore::new());
        let jobs = Arc::new(MemoryJobStore::new());
        let owner = UserId::from("u1");
        let svc = service(
            Arc::clone(&files),
            Arc::clone(&jobs),
            Arc::new(AlwaysCleanScanner::new()),
            Arc::new(NoopTextExtractor::new()),
        );

        let ticket = svc.create_upload_slot(&owner, upload()).await.unwrap();
        svc.complete_upload(&owner, &ticket.file.id).await.unwrap();

        // The one file_scan job in the store is terminal; nothing is claimable.
        assert!(jobs.claim_next(JobKind::FileScan).await.unwrap().is_none());
    }
}
