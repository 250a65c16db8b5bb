use std::sync::Arc;

use thiserror::Error;

use claimdesk_provider::{
    DraftEngine, Mailer, ObjectStore, PdfRenderer, TextExtractor, VirusScanner,
};
use claimdesk_state::idempotency::IdempotencyStore;
use claimdesk_state::store::{
    ClaimStore, FileStore, InsurerDirectory, JobStore, UserStore, WebhookStore,
};

use crate::draft::DraftService;
use crate::email::EmailService;
use crate::pdf::PdfService;
use crate::storage::StorageService;
use crate::submission::SubmissionService;

/// The engine could not be assembled from the given parts.
#[derive(Debug, Error)]
#[error("engine configuration error: {0}")]
pub struct BuildError(String);

/// The assembled domain layer: every store and service, wired once at
/// startup and shared behind `Arc` by the HTTP surface.
pub struct Engine {
    claims: Arc<dyn ClaimStore>,
    files: Arc<dyn FileStore>,
    jobs: Arc<dyn JobStore>,
    directory: Arc<dyn InsurerDirectory>,
    webhooks: Arc<dyn WebhookStore>,
    users: Arc<dyn UserStore>,
    idempotency: Arc<dyn IdempotencyStore>,
    drafts: DraftService,
    storage: StorageService,
    pdf: PdfService,
    email: EmailService,
    submission: SubmissionService,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").finish_non_exhaustive()
    }
}

impl Engine {
    /// Start building an engine.
    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn claims(&self) -> &Arc<dyn ClaimStore> {
        &self.claims
    }

    pub fn files(&self) -> &Arc<dyn FileStore> {
        &self.files
    }

    pub fn jobs(&self) -> &Arc<dyn JobStore> {
        &self.jobs
    }

    pub fn directory(&self) -> &Arc<dyn InsurerDirectory> {
        &self.directory
    }

    pub fn webhooks(&self) -> &Arc<dyn WebhookStore> {
        &self.webhooks
    }

    pub fn users(&self) -> &Arc<dyn UserStore> {
        &self.users
    }

    pub fn idempotency(&self) -> &Arc<dyn IdempotencyStore> {
        &self.idempotency
    }

    pub fn drafts(&self) -> &DraftService {
        &self.drafts
    }

    pub fn storage(&self) -> &StorageService {
        &self.storage
    }

    pub fn pdf(&self) -> &PdfService {
        &self.pdf
    }

    pub fn email(&self) -> &EmailService {
        &self.email
    }

    pub fn submission(&self) -> &SubmissionService {
        &self.submission
    }
}

/// Builder wiring stores and providers into an [`Engine`].
#[derive(Default)]
pub struct EngineBuilder {
    claims: Option<Arc<dyn ClaimStore>>,
    files: Option<Arc<dyn FileStore>>,
    jobs: Option<Arc<dyn JobStore>>,
    directory: Option<Arc<dyn InsurerDirectory>>,
    webhooks: Option<Arc<dyn WebhookStore>>,
    users: Option<Arc<dyn UserStore>>,
    idempotency: Option<Arc<dyn IdempotencyStore>>,
    draft_engine: Option<Arc<dyn DraftEngine>>,
    object_store: Option<Arc<dyn ObjectStore>>,
    scanner: Option<Arc<dyn VirusScanner>>,
    extractor: Option<Arc<dyn TextExtractor>>,
    renderer: Option<Arc<dyn PdfRenderer>>,
    mailer: Option<Arc<dyn Mailer>>,
}

impl EngineBuilder {
    #[must_use]
    pub fn claims(mut self, claims: Arc<dyn ClaimStore>) -> Self {
        self.claims = Some(claims);
        self
    }

    #[must_use]
    pub fn files(mut self, files: Arc<dyn FileStore>) -> Self {
        self.files = Some(files);
        self
    }

    #[must_use]
    pub fn jobs(mut self, jobs: Arc<dyn JobStore>) -> Self {
        self.jobs = Some(jobs);
        self
    }

    #[must_use]
    pub fn directory(mut self, directory: Arc<dyn InsurerDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    #[must_use]
    pub fn webhooks(mut self, webhooks: Arc<dyn WebhookStore>) -> Self {
        self.webhooks = Some(webhooks);
        self
    }

    #[must_use]
    pub fn users(mut self, users: Arc<dyn UserStore>) -> Self {
        self.users = Some(users);
        self
    }

    #[must_use]
    pub fn idempotency(mut self, idempotency: Arc<dyn IdempotencyStore>) -> Self {
        self.idempotency = Some(idempotency);
        self
    }

    #[must_use]
    pub fn draft_engine(mut self, engine: Arc<dyn DraftEngine>) -> Self {
        self.draft_engine = Some(engine);
        self
    }

    #[must_use]
    pub fn object_store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.object_store = Some(store);
        self
    }

    #[must_use]
    pub fn scanner(mut self, scanner: Arc<dyn VirusScanner>) -> Self {
        self.scanner = Some(scanner);
        self
    }

    #[must_use]
    pub fn extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    #[must_use]
    pub fn renderer(mut self, renderer: Arc<dyn PdfRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    #[must_use]
    pub fn mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    /// Assemble the engine, failing if any store or provider is missing.
    pub fn build(self) -> Result<Engine, BuildError> {
        fn require<T>(part: Option<T>, name: &str) -> Result<T, BuildError> {
            part.ok_or_else(|| BuildError(format!("{name} is required")))
        }

        let claims = require(self.claims, "claim store")?;
        let files = require(self.files, "file store")?;
        let jobs = require(self.jobs, "job store")?;
        let directory = require(self.directory, "insurer directory")?;
        let webhooks = require(self.webhooks, "webhook store")?;
        let users = require(self.users, "user store")?;
        let idempotency = require(self.idempotency, "idempotency store")?;
        let draft_engine = require(self.draft_engine, "draft engine")?;
        let object_store = require(self.object_store, "object store")?;
        let scanner = require(self.scanner, "virus scanner")?;
        let extractor = require(self.extractor, "text extractor")?;
        let renderer = require(self.renderer, "pdf renderer")?;
        let mailer = require(self.mailer, "mailer")?;

        let drafts = DraftService::new(Arc::clone(&claims), Arc::clone(&jobs), draft_engine);
        let storage = StorageService::new(
            Arc::clone(&files),
            Arc::clone(&jobs),
            object_store,
            scanner,
            extractor,
        );
        let pdf = PdfService::new(Arc::clone(&claims), Arc::clone(&jobs), renderer);
        let email = EmailService::new(Arc::clone(&claims), Arc::clone(&jobs), mailer);

        Ok(Engine {
            claims,
            files,
            jobs,
            directory,
            webhooks,
            users,
            idempotency,
            drafts,
            storage,
            pdf,
            email,
            submission: SubmissionService::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use claimdesk_provider::{
        AlwaysCleanScanner, LocalDraftEngine, LocalObjectStore, LocalPdfRenderer, LogMailer,
        NoopTextExtractor,
    };
    use claimdesk_state_memory::{
        MemoryClaimStore, MemoryFileStore, MemoryIdempotencyStore, MemoryInsurerDirectory,
        MemoryJobStore, MemoryUserStore, MemoryWebhookStore,
    };

    use super::*;

    #[test]
    fn missing_store_is_a_build_error() {
        let err = Engine::builder().build().unwrap_err();
        assert!(err.to_string().contains("claim store"));
    }

    #[test]
    fn full_wiring_builds() {
        let engine = Engine::builder()
            .claims(Arc::new(MemoryClaimStore::new()))
            .files(Arc::new(MemoryFileStore::new()))
            .jobs(Arc::new(MemoryJobStore::new()))
            .directory(Arc::new(MemoryInsurerDirectory::seeded()))
            .webhooks(Arc::new(MemoryWebhookStore::new()))
            .users(Arc::new(MemoryUserStore::new()))
            .idempotency(Arc::new(MemoryIdempotencyStore::new()))
            .draft_engine(Arc::new(LocalDraftEngine::new()))
            .object_store(Arc::new(LocalObjectStore::new(
                "https://storage.local",
                "uploads",
            )))
            .scanner(Arc::new(AlwaysCleanScanner::new()))
            .extractor(Arc::new(NoopTextExtractor::new()))
            .renderer(Arc::new(LocalPdfRenderer::new("https://storage.local")))
            .mailer(Arc::new(LogMailer::new()))
            .build();
        assert!(engine.is_ok());
    }
}
