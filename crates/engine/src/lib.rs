pub mod builder;
pub mod draft;
pub mod email;
pub mod idempotency;
pub mod jobs;
pub mod pdf;
pub mod policy;
pub mod storage;
pub mod submission;

pub use builder::{BuildError, Engine, EngineBuilder};
pub use draft::DraftService;
pub use email::EmailService;
pub use idempotency::run_idempotent;
pub use jobs::run_worker_once;
pub use pdf::PdfService;
pub use policy::{PolicyValidation, validate_policy_number};
pub use storage::{NewFileUpload, StorageService, UploadTicket};
pub use submission::SubmissionService;
