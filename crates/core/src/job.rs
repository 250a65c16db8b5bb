use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ClaimdeskError;
use crate::types::{JobId, UserId, prefixed_id};

/// The fixed set of asynchronous work item types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    DraftGeneration,
    PdfGeneration,
    EmailDelivery,
    FileScan,
}

impl JobKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DraftGeneration => "draft_generation",
            Self::PdfGeneration => "pdf_generation",
            Self::EmailDelivery => "email_delivery",
            Self::FileScan => "file_scan",
        }
    }
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a [`Job`]. Transitions are one-directional:
/// `Queued -> Running -> Succeeded | Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Succeeded,
    Failed,
}

impl JobStatus {
    /// Returns `true` once the job has reached a terminal state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An asynchronous unit of work owned by a single caller.
///
/// Jobs are created in `Queued` by a domain service and mutated only by the
/// component that owns the corresponding unit of work. Once terminal they
/// are immutable: `result` is populated only on success, `error` only on
/// failure, and progress is monotone non-decreasing while running.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Job {
    /// Unique job identifier.
    pub id: JobId,
    /// Caller that owns this job.
    pub owner: UserId,
    /// Work item type tag.
    pub kind: JobKind,
    /// Current lifecycle state.
    pub status: JobStatus,
    /// Completion percentage, 0-100.
    pub progress: u8,
    /// Opaque input payload recorded at enqueue time.
    #[cfg_attr(feature = "openapi", schema(value_type = HashMap<String, Object>))]
    pub payload: HashMap<String, serde_json::Value>,
    /// Result payload; populated only when `status` is `Succeeded`.
    #[cfg_attr(feature = "openapi", schema(value_type = HashMap<String, Object>))]
    pub result: HashMap<String, serde_json::Value>,
    /// Failure message; populated only when `status` is `Failed`.
    pub error: Option<String>,
    /// Timestamp when the job was enqueued.
    pub created_at: DateTime<Utc>,
}

impl Job {
    /// Create a new job in `Queued` with a generated `job_` identifier.
    #[must_use]
    pub fn enqueue(
        owner: impl Into<UserId>,
        kind: JobKind,
        payload: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            id: JobId::new(prefixed_id("job")),
            owner: owner.into(),
            kind,
            status: JobStatus::Queued,
            progress: 0,
            payload,
            result: HashMap::new(),
            error: None,
            created_at: Utc::now(),
        }
    }

    /// Transition `Queued -> Running`.
    pub fn start(&mut self) -> Result<(), ClaimdeskError> {
        match self.status {
            JobStatus::Queued => {
                self.status = JobStatus::Running;
                Ok(())
            }
            other => Err(ClaimdeskError::Conflict(format!(
                "job {} cannot start from {other}",
                self.id
            ))),
        }
    }

    /// Advance progress. Valid only while `Running`, and only forward.
    pub fn advance_progress(&mut self, percent: u8) -> Result<(), ClaimdeskError> {
        if self.status != JobStatus::Running {
            return Err(ClaimdeskError::Conflict(format!(
                "job {} is not running",
                self.id
            )));
        }
        if percent > 100 || percent < self.progress {
            return Err(ClaimdeskError::Conflict(format!(
                "progress must move forward within 0-100, got {percent} after {}",
                self.progress
            )));
        }
        self.progress = percent;
        Ok(())
    }

    /// Transition `Running -> Succeeded`, pinning progress to 100.
    pub fn succeed(
        &mut self,
        result: HashMap<String, serde_json::Value>,
    ) -> Result<(), ClaimdeskError> {
        if self.status != JobStatus::Running {
            return Err(ClaimdeskError::Conflict(format!(
                "job {} cannot succeed from {}",
                self.id, self.status
            )));
        }
        self.status = JobStatus::Succeeded;
        self.progress = 100;
        self.result = result;
        Ok(())
    }

    /// Transition `Running -> Failed` with an error message.
    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), ClaimdeskError> {
        if self.status != JobStatus::Running {
            return Err(ClaimdeskError::Conflict(format!(
                "job {} cannot fail from {}",
                self.id, self.status
            )));
        }
        self.status = JobStatus::Failed;
        self.error = Some(error.into());
        Ok(())
    }
}
