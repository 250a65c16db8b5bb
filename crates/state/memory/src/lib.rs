pub mod claims;
pub mod directory;
pub mod files;
pub mod idempotency;
pub mod jobs;
pub mod users;
pub mod webhooks;

pub use claims::MemoryClaimStore;
pub use directory::MemoryInsurerDirectory;
pub use files::MemoryFileStore;
pub use idempotency::MemoryIdempotencyStore;
pub use jobs::MemoryJobStore;
pub use users::MemoryUserStore;
pub use webhooks::MemoryWebhookStore;
