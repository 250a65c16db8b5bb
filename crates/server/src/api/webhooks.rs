use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use tracing::info;

use claimdesk_core::Webhook;

use crate::auth::identity::CallerIdentity;
use crate::error::{ApiError, Problem};

use super::AppState;
use super::schemas::{AckResponse, RegisterWebhookRequest};

/// `POST /v1/webhooks/outgoing` -- register a callback URL for the caller.
#[utoipa::path(
    post,
    path = "/v1/webhooks/outgoing",
    tag = "Webhooks",
    summary = "Register outgoing webhook",
    request_body = RegisterWebhookRequest,
    responses(
        (status = 200, description = "Webhook registered", body = AckResponse),
        (status = 401, description = "Unauthenticated", body = Problem)
    )
)]
pub async fn register_webhook(
    State(state): State<AppState>,
    axum::Extension(identity): axum::Extension<CallerIdentity>,
    Json(payload): Json<RegisterWebhookRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let webhook = state
        .engine
        .webhooks()
        .register(Webhook::new(identity.id.as_str(), payload.url))
        .await?;
    info!(webhook_id = %webhook.id, "outgoing webhook registered");
    Ok(Json(AckResponse { ok: true }))
}

/// `POST /v1/webhooks/incoming/insurer` -- accept an insurer callback.
///
/// Public endpoint; a deployment fronted by a real insurer integration
/// verifies the provider's signature here before acknowledging.
#[utoipa::path(
    post,
    path = "/v1/webhooks/incoming/insurer",
    tag = "Webhooks",
    summary = "Accept insurer callback",
    responses(
        (status = 200, description = "Callback acknowledged", body = AckResponse)
    )
)]
pub async fn incoming_insurer() -> impl IntoResponse {
    Json(AckResponse { ok: true })
}
