use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{FileId, UserId, prefixed_id};

/// What a file attachment is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum FilePurpose {
    IncidentImage,
    PolicyPdf,
    Other,
}

/// Upload + scan lifecycle of a file:
/// `Pending -> Uploaded -> Scanning -> Ready | Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Pending,
    Uploaded,
    Scanning,
    Ready,
    Failed,
}

impl FileStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Uploaded => "uploaded",
            Self::Scanning => "scanning",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

/// Verdict produced by the virus scan step.
///
/// Leaves `Unknown` only after a scan job completes; a file becomes
/// [`FileStatus::Ready`] only when the verdict is `Clean`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ScanVerdict {
    Unknown,
    Clean,
    Infected,
}

impl ScanVerdict {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Clean => "clean",
            Self::Infected => "infected",
        }
    }
}

/// Metadata record for an uploaded file; the bytes live in object storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FileRecord {
    /// Unique file identifier.
    pub id: FileId,
    /// Caller that owns this file.
    pub owner: UserId,
    /// What this file is for.
    pub purpose: FilePurpose,
    /// MIME content type declared at slot creation.
    pub content_type: String,
    /// Original filename, when provided.
    pub filename: Option<String>,
    /// Declared size in bytes, when provided.
    pub size: Option<u64>,
    /// Upload + scan lifecycle state.
    pub status: FileStatus,
    /// Virus scan verdict.
    pub virus_scan: ScanVerdict,
    /// Text extracted by OCR, when available.
    pub ocr_text: Option<String>,
    /// Timestamp when the upload slot was created.
    pub created_at: DateTime<Utc>,
}

impl FileRecord {
    /// Create a new pending file record with a generated `file_` identifier.
    #[must_use]
    pub fn new(
        owner: impl Into<UserId>,
        purpose: FilePurpose,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            id: FileId::new(prefixed_id("file")),
            owner: owner.into(),
            purpose,
            content_type: content_type.into(),
            filename: None,
            size: None,
            status: FileStatus::Pending,
            virus_scan: ScanVerdict::Unknown,
            ocr_text: None,
            created_at: Utc::now(),
        }
    }

    /// Set the original filename.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Set the declared size in bytes.
    #[must_use]
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_file_is_pending_unknown() {
        let file = FileRecord::new("user-1", FilePurpose::IncidentImage, "image/png");
        assert_eq!(file.status, FileStatus::Pending);
        assert_eq!(file.virus_scan, ScanVerdict::Unknown);
        assert!(file.id.as_str().starts_with("file_"));
    }

    #[test]
    fn purpose_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&FilePurpose::PolicyPdf).unwrap(),
            "\"policy_pdf\""
        );
    }

    #[test]
    fn builder_sets_optionals() {
        let file = FileRecord::new("user-1", FilePurpose::Other, "application/pdf")
            .with_filename("receipt.pdf")
            .with_size(2048);
        assert_eq!(file.filename.as_deref(), Some("receipt.pdf"));
        assert_eq!(file.size, Some(2048));
    }
}
