use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use claimdesk_engine::Engine;
use claimdesk_provider::{
    AlwaysCleanScanner, LocalDraftEngine, LocalObjectStore, LocalPdfRenderer, LogMailer,
    NoopTextExtractor,
};
use claimdesk_server::api::{AppState, router};
use claimdesk_server::auth::TokenVerifier;
use claimdesk_server::config::{AuthMode, ClaimdeskConfig};
use claimdesk_state_memory::{
    MemoryClaimStore, MemoryFileStore, MemoryIdempotencyStore, MemoryInsurerDirectory,
    MemoryJobStore, MemoryUserStore, MemoryWebhookStore,
};

/// Claimdesk claims-backend HTTP server.
#[derive(Parser, Debug)]
#[command(name = "claimdesk-server", about = "HTTP server for the claimdesk claims backend")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "claimdesk.toml")]
    config: String,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration from the TOML file, or use defaults if absent.
    let config: ClaimdeskConfig = if Path::new(&cli.config).exists() {
        let contents = std::fs::read_to_string(&cli.config)?;
        toml::from_str(&contents)?
    } else {
        toml::from_str("")?
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if !Path::new(&cli.config).exists() {
        info!(path = %cli.config, "config file not found, using defaults");
    }

    // Choose the token verification mode once, here. The insecure mode is an
    // explicit configuration choice, never a fallback.
    let verifier = match config.auth.mode {
        AuthMode::Jwks => {
            let url = config
                .auth
                .jwks_url
                .clone()
                .ok_or("auth.jwks_url is required when auth.mode = \"jwks\"")?;
            info!(
                url = %url,
                audience = config.auth.audience.as_deref().unwrap_or("(unchecked)"),
                "token verification against remote key set"
            );
            TokenVerifier::jwks(
                url,
                config.auth.audience.clone(),
                Duration::from_secs(config.auth.cache_ttl_seconds),
            )
        }
        AuthMode::InsecureLocal => {
            tracing::warn!(
                "auth.mode = \"insecure-local\": token signatures are NOT verified; never use this against real traffic"
            );
            TokenVerifier::insecure_local()
        }
    };

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
            config.storage.base_url.clone(),
            config.storage.bucket.clone(),
        )))
        .scanner(Arc::new(AlwaysCleanScanner::new()))
        .extractor(Arc::new(NoopTextExtractor::new()))
        .renderer(Arc::new(LocalPdfRenderer::new(
            config.storage.base_url.clone(),
        )))
        .mailer(Arc::new(LogMailer::new()))
        .build()?;

    let state = AppState {
        engine: Arc::new(engine),
    };
    let app = router(state, Arc::new(verifier));

    let host = cli.host.unwrap_or_else(|| config.server.host.clone());
    let port = cli.port.unwrap_or(config.server.port);
    let addr = format!("{host}:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "claimdesk server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("ctrl-c handler should install");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("sigterm handler should install")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received");
}
