pub mod error;
pub mod idempotency;
pub mod store;
pub mod testing;

pub use error::StoreError;
pub use idempotency::{Begin, IdempotencyStore};
pub use store::{
    ClaimFilter, ClaimPage, ClaimPatch, ClaimStore, FileStore, InsurerDirectory, InsurerPage,
    JobStore, UserStore, WebhookStore,
};
