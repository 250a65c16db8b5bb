pub mod draft;
pub mod error;
pub mod mail;
pub mod object_store;
pub mod ocr;
pub mod pdf;
pub mod scan;

pub use draft::{DraftEngine, LocalDraftEngine};
pub use error::ProviderError;
pub use mail::{LogMailer, Mailer};
pub use object_store::{LocalObjectStore, ObjectStore, UploadSlot};
pub use ocr::{NoopTextExtractor, TextExtractor};
pub use pdf::{LocalPdfRenderer, PdfRenderer};
pub use scan::{AlwaysCleanScanner, VirusScanner};
