pub mod claims;
pub mod files;
pub mod health;
pub mod jobs;
pub mod openapi;
pub mod providers;
pub mod schemas;
pub mod stream;
pub mod users;
pub mod webhooks;

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderMap;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use claimdesk_engine::Engine;

use crate::auth::TokenVerifier;
use crate::auth::middleware::AuthLayer;
use crate::request_id::propagate_request_id;

use self::openapi::ApiDoc;

/// Header callers use to opt a side-effecting request into idempotency.
pub const IDEMPOTENCY_KEY: &str = "idempotency-key";

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The assembled domain layer.
    pub engine: Arc<Engine>,
}

/// Read the caller's idempotency key, when one was supplied.
pub(crate) fn idempotency_key(headers: &HeaderMap) -> Option<String> {
    headers
        .get(IDEMPOTENCY_KEY)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}

/// Build the Axum router with all API routes, middleware, and Swagger UI.
pub fn router(state: AppState, verifier: Arc<TokenVerifier>) -> Router {
    let public = Router::new()
        // Health (always public)
        .route("/v1/health", get(health::health))
        // Incoming insurer callbacks authenticate via provider signature,
        // not bearer tokens
        .route(
            "/v1/webhooks/incoming/insurer",
            post(webhooks::incoming_insurer),
        );

    let protected = Router::new()
        // Current user
        .route("/v1/users/me", get(users::me))
        // Files (two-phase upload)
        .route("/v1/files", post(files::create_file_slot))
        .route("/v1/files/{file_id}/complete", post(files::complete_upload))
        .route("/v1/files/{file_id}", get(files::get_file))
        // Insurer directory
        .route("/v1/providers", get(providers::search_providers))
        .route(
            "/v1/providers/validate-policy",
            post(providers::validate_policy),
        )
        // Claims
        .route(
            "/v1/claims",
            post(claims::create_claim).get(claims::list_claims),
        )
        .route(
            "/v1/claims/{claim_id}",
            get(claims::get_claim).patch(claims::update_claim),
        )
        .route("/v1/claims/{claim_id}/drafts", post(claims::start_draft))
        .route(
            "/v1/claims/{claim_id}/finalize",
            post(claims::finalize_claim),
        )
        .route(
            "/v1/claims/{claim_id}/pdf",
            post(claims::generate_pdf).get(claims::get_pdf),
        )
        .route("/v1/claims/{claim_id}/email", post(claims::send_email))
        .route("/v1/claims/{claim_id}/submit", post(claims::submit_claim))
        .route("/v1/claims/{claim_id}/status", get(claims::claim_status))
        // Jobs
        .route("/v1/jobs/{job_id}", get(jobs::get_job))
        // SSE job progress stream
        .route("/v1/stream/jobs/{job_id}", get(stream::stream_job))
        // Outgoing webhooks
        .route("/v1/webhooks/outgoing", post(webhooks::register_webhook))
        .layer(AuthLayer::new(verifier));

    Router::new()
        .merge(public)
        .merge(protected)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        // Correlation id must wrap everything that can emit a problem body.
        .layer(middleware::from_fn(propagate_request_id))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
