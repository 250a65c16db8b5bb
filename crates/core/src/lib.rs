pub mod caller;
pub mod claim;
pub mod error;
pub mod file;
pub mod insurer;
pub mod job;
pub mod page;
pub mod types;
pub mod webhook;

pub use caller::Caller;
pub use claim::{Claim, ClaimDraft, ClaimStatus, ClaimType};
pub use error::{ClaimdeskError, FieldError};
pub use file::{FilePurpose, FileRecord, FileStatus, ScanVerdict};
pub use insurer::Insurer;
pub use job::{Job, JobKind, JobStatus};
pub use page::{PageLimit, decode_cursor, encode_cursor};
pub use types::{ClaimId, FileId, InsurerId, JobId, UserId, WebhookId, prefixed_id};
pub use webhook::Webhook;
