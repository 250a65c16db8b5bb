use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use serde::Deserialize;

use claimdesk_core::{
    Claim, ClaimId, ClaimStatus, ClaimdeskError, FileId, InsurerId, PageLimit, decode_cursor,
    encode_cursor,
};
use claimdesk_engine::run_idempotent;
use claimdesk_state::store::{ClaimFilter, ClaimPatch};

use crate::auth::identity::CallerIdentity;
use crate::error::{ApiError, Problem};

use super::schemas::{
    ClaimListResponse, ClaimResponse, ClaimStatusResponse, CreateClaimRequest, JobResponse,
    PdfResponse, StartDraftRequest, UpdateClaimRequest,
};
use super::{AppState, idempotency_key};

/// Query parameters for the claim list endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct ListClaimsQuery {
    /// Only return claims in this state.
    pub status: Option<ClaimStatus>,
    /// Page size, 1-100.
    pub limit: Option<usize>,
    /// Opaque cursor from a previous page.
    pub cursor: Option<String>,
}

fn claim_from_request(owner: &CallerIdentity, payload: CreateClaimRequest) -> Claim {
    let mut claim = Claim::new(owner.id.as_str(), payload.claim_type);
    claim.insurer_id = payload.provider_id.map(InsurerId::from);
    claim.insurer_name = payload.provider_name;
    claim.policy_number = payload.policy_number;
    claim.incident_description = payload.incident_description;
    claim.incident_occurred_at = payload.incident_occurred_at;
    claim.incident_location = payload.incident_location;
    claim.incident_metadata = payload.incident_metadata;
    claim.attachments = payload.attachments.into_iter().map(FileId::from).collect();
    claim
}

fn patch_from_request(payload: UpdateClaimRequest) -> ClaimPatch {
    ClaimPatch {
        insurer_id: payload.provider_id.map(InsurerId::from),
        insurer_name: payload.provider_name,
        policy_number: payload.policy_number,
        incident_description: payload.incident_description,
        incident_occurred_at: payload.incident_occurred_at,
        incident_location: payload.incident_location,
        incident_metadata: payload.incident_metadata,
        attachments: payload
            .attachments
            .map(|ids| ids.into_iter().map(FileId::from).collect()),
    }
}

async fn assemble_response(
    state: &AppState,
    claim: Claim,
) -> Result<ClaimResponse, ClaimdeskError> {
    let draft = state.engine.claims().draft(&claim.id).await?;
    Ok(ClaimResponse::assemble(claim, draft))
}

/// `POST /v1/claims` -- create a claim in `draft`.
///
/// Honors the `Idempotency-Key` header: retries with the same key replay the
/// stored response instead of creating another claim.
#[utoipa::path(
    post,
    path = "/v1/claims",
    tag = "Claims",
    summary = "Create claim",
    request_body = CreateClaimRequest,
    responses(
        (status = 201, description = "Claim created", body = ClaimResponse),
        (status = 401, description = "Unauthenticated", body = Problem),
        (status = 422, description = "Validation failed", body = Problem)
    )
)]
pub async fn create_claim(
    State(state): State<AppState>,
    axum::Extension(identity): axum::Extension<CallerIdentity>,
    headers: HeaderMap,
    Json(payload): Json<CreateClaimRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let caller = identity.user_id();
    let key = idempotency_key(&headers);

    let value = run_idempotent(
        state.engine.idempotency().as_ref(),
        &caller,
        key.as_deref(),
        || {
            let state = state.clone();
            let identity = identity.clone();
            let payload = payload.clone();
            async move {
                let claim = state
                    .engine
                    .claims()
                    .create(claim_from_request(&identity, payload))
                    .await?;
                let response = assemble_response(&state, claim).await?;
                serde_json::to_value(response)
                    .map_err(|err| ClaimdeskError::Unavailable(err.to_string()))
            }
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(value)))
}

/// `GET /v1/claims` -- list the caller's claims, newest first.
#[utoipa::path(
    get,
    path = "/v1/claims",
    tag = "Claims",
    summary = "List claims",
    params(
        ("status" = Option<String>, Query, description = "Filter by claim status"),
        ("limit" = Option<usize>, Query, description = "Page size (1-100)"),
        ("cursor" = Option<String>, Query, description = "Opaque cursor from a previous page")
    ),
    responses(
        (status = 200, description = "One page of claims", body = ClaimListResponse),
        (status = 401, description = "Unauthenticated", body = Problem),
        (status = 422, description = "Invalid limit or cursor", body = Problem)
    )
)]
pub async fn list_claims(
    State(state): State<AppState>,
    axum::Extension(identity): axum::Extension<CallerIdentity>,
    Query(query): Query<ListClaimsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let caller = identity.user_id();

    let limit = match query.limit {
        Some(limit) => PageLimit::new(limit).map_err(ApiError)?,
        None => PageLimit::default(),
    };
    let after = query
        .cursor
        .as_deref()
        .map(decode_cursor)
        .transpose()
        .map_err(ApiError)?;

    let page = state
        .engine
        .claims()
        .list(
            &caller,
            ClaimFilter {
                status: query.status,
                limit,
                after,
            },
        )
        .await?;

    let mut items = Vec::with_capacity(page.items.len());
    for claim in page.items {
        items.push(assemble_response(&state, claim).await.map_err(ApiError)?);
    }

    Ok(Json(ClaimListResponse {
        items,
        next_cursor: page.next_after.as_deref().map(encode_cursor),
    }))
}

/// `GET /v1/claims/{claim_id}` -- fetch one claim.
#[utoipa::path(
    get,
    path = "/v1/claims/{claim_id}",
    tag = "Claims",
    summary = "Get claim",
    params(("claim_id" = String, Path, description = "Claim identifier")),
    responses(
        (status = 200, description = "The claim", body = ClaimResponse),
        (status = 404, description = "Unknown or foreign claim", body = Problem)
    )
)]
pub async fn get_claim(
    State(state): State<AppState>,
    axum::Extension(identity): axum::Extension<CallerIdentity>,
    Path(claim_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let caller = identity.user_id();
    let claim = state
        .engine
        .claims()
        .get(&caller, &ClaimId::from(claim_id))
        .await?;
    let response = assemble_response(&state, claim).await.map_err(ApiError)?;
    Ok(Json(response))
}

/// `PATCH /v1/claims/{claim_id}` -- partially update a claim.
#[utoipa::path(
    patch,
    path = "/v1/claims/{claim_id}",
    tag = "Claims",
    summary = "Update claim",
    params(("claim_id" = String, Path, description = "Claim identifier")),
    request_body = UpdateClaimRequest,
    responses(
        (status = 200, description = "The updated claim", body = ClaimResponse),
        (status = 404, description = "Unknown or foreign claim", body = Problem)
    )
)]
pub async fn update_claim(
    State(state): State<AppState>,
    axum::Extension(identity): axum::Extension<CallerIdentity>,
    Path(claim_id): Path<String>,
    Json(payload): Json<UpdateClaimRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let caller = identity.user_id();
    let claim = state
        .engine
        .claims()
        .update(&caller, &ClaimId::from(claim_id), patch_from_request(payload))
        .await?;
    let response = assemble_response(&state, claim).await.map_err(ApiError)?;
    Ok(Json(response))
}

/// `POST /v1/claims/{claim_id}/drafts` -- start AI draft generation.
///
/// Returns 202 with the job; poll `GET /v1/jobs/{id}` or subscribe to
/// `GET /v1/stream/jobs/{id}` for progress.
#[utoipa::path(
    post,
    path = "/v1/claims/{claim_id}/drafts",
    tag = "Claims",
    summary = "Start draft generation",
    params(("claim_id" = String, Path, description = "Claim identifier")),
    request_body = StartDraftRequest,
    responses(
        (status = 202, description = "Draft job accepted", body = JobResponse),
        (status = 404, description = "Unknown or foreign claim", body = Problem),
        (status = 503, description = "Drafting provider unavailable", body = Problem)
    )
)]
pub async fn start_draft(
    State(state): State<AppState>,
    axum::Extension(identity): axum::Extension<CallerIdentity>,
    Path(claim_id): Path<String>,
    Json(payload): Json<StartDraftRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let caller = identity.user_id();
    let job = state
        .engine
        .drafts()
        .start_draft(&caller, &ClaimId::from(claim_id), payload.notes)
        .await
        .map_err(ApiError)?;
    Ok((StatusCode::ACCEPTED, Json(JobResponse::from(job))))
}

/// `POST /v1/claims/{claim_id}/finalize` -- lock the claim for submission.
#[utoipa::path(
    post,
    path = "/v1/claims/{claim_id}/finalize",
    tag = "Claims",
    summary = "Finalize claim",
    params(("claim_id" = String, Path, description = "Claim identifier")),
    responses(
        (status = 200, description = "The finalized claim", body = ClaimResponse),
        (status = 404, description = "Unknown or foreign claim", body = Problem)
    )
)]
pub async fn finalize_claim(
    State(state): State<AppState>,
    axum::Extension(identity): axum::Extension<CallerIdentity>,
    Path(claim_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let caller = identity.user_id();
    let claim = state
        .engine
        .claims()
        .finalize(&caller, &ClaimId::from(claim_id))
        .await?;
    let response = assemble_response(&state, claim).await.map_err(ApiError)?;
    Ok(Json(response))
}

/// `POST /v1/claims/{claim_id}/pdf` -- start PDF generation.
#[utoipa::path(
    post,
    path = "/v1/claims/{claim_id}/pdf",
    tag = "Claims",
    summary = "Generate claim PDF",
    params(("claim_id" = String, Path, description = "Claim identifier")),
    responses(
        (status = 202, description = "PDF job accepted", body = JobResponse),
        (status = 404, description = "Unknown or foreign claim", body = Problem),
        (status = 503, description = "Rendering provider unavailable", body = Problem)
    )
)]
pub async fn generate_pdf(
    State(state): State<AppState>,
    axum::Extension(identity): axum::Extension<CallerIdentity>,
    Path(claim_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let caller = identity.user_id();
    let job = state
        .engine
        .pdf()
        .start_pdf(&caller, &ClaimId::from(claim_id))
        .await
        .map_err(ApiError)?;
    Ok((StatusCode::ACCEPTED, Json(JobResponse::from(job))))
}

/// `GET /v1/claims/{claim_id}/pdf` -- fetch the rendered document URL.
#[utoipa::path(
    get,
    path = "/v1/claims/{claim_id}/pdf",
    tag = "Claims",
    summary = "Get claim PDF",
    params(("claim_id" = String, Path, description = "Claim identifier")),
    responses(
        (status = 200, description = "Document URL, null until rendered", body = PdfResponse),
        (status = 404, description = "Unknown or foreign claim", body = Problem)
    )
)]
pub async fn get_pdf(
    State(state): State<AppState>,
    axum::Extension(identity): axum::Extension<CallerIdentity>,
    Path(claim_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let caller = identity.user_id();
    let url = state
        .engine
        .pdf()
        .get_pdf(&caller, &ClaimId::from(claim_id))
        .await
        .map_err(ApiError)?;
    Ok(Json(PdfResponse { url }))
}

/// `POST /v1/claims/{claim_id}/email` -- email the claim summary.
///
/// Honors the `Idempotency-Key` header so retried sends deliver once.
#[utoipa::path(
    post,
    path = "/v1/claims/{claim_id}/email",
    tag = "Claims",
    summary = "Email claim",
    params(("claim_id" = String, Path, description = "Claim identifier")),
    responses(
        (status = 202, description = "Email job accepted", body = JobResponse),
        (status = 404, description = "Unknown or foreign claim", body = Problem),
        (status = 503, description = "Delivery provider unavailable", body = Problem)
    )
)]
pub async fn send_email(
    State(state): State<AppState>,
    axum::Extension(identity): axum::Extension<CallerIdentity>,
    Path(claim_id): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let caller = identity.user_id();
    let key = idempotency_key(&headers);
    let claim_id = Arc::new(ClaimId::from(claim_id));

    let value = run_idempotent(
        state.engine.idempotency().as_ref(),
        &caller,
        key.as_deref(),
        || {
            let state = state.clone();
            let identity = identity.clone();
            let claim_id = Arc::clone(&claim_id);
            async move {
                let job = state
                    .engine
                    .email()
                    .start_email(&identity.to_caller(), &claim_id)
                    .await?;
                serde_json::to_value(JobResponse::from(job))
                    .map_err(|err| ClaimdeskError::Unavailable(err.to_string()))
            }
        },
    )
    .await?;

    Ok((StatusCode::ACCEPTED, Json(value)))
}

/// `POST /v1/claims/{claim_id}/submit` -- submit to the insurer (stub).
#[utoipa::path(
    post,
    path = "/v1/claims/{claim_id}/submit",
    tag = "Claims",
    summary = "Submit claim",
    params(("claim_id" = String, Path, description = "Claim identifier")),
    responses(
        (status = 501, description = "Submission is not implemented", body = Problem)
    )
)]
pub async fn submit_claim(
    State(state): State<AppState>,
    axum::Extension(identity): axum::Extension<CallerIdentity>,
    Path(claim_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let caller = identity.user_id();
    let value = state
        .engine
        .submission()
        .submit(&caller, &ClaimId::from(claim_id))
        .await
        .map_err(ApiError)?;
    Ok(Json(value))
}

/// `GET /v1/claims/{claim_id}/status` -- reduced status view.
#[utoipa::path(
    get,
    path = "/v1/claims/{claim_id}/status",
    tag = "Claims",
    summary = "Get claim status",
    params(("claim_id" = String, Path, description = "Claim identifier")),
    responses(
        (status = 200, description = "Claim id and status", body = ClaimStatusResponse),
        (status = 404, description = "Unknown or foreign claim", body = Problem)
    )
)]
pub async fn claim_status(
    State(state): State<AppState>,
    axum::Extension(identity): axum::Extension<CallerIdentity>,
    Path(claim_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let caller = identity.user_id();
    let claim = state
        .engine
        .claims()
        .get(&caller, &ClaimId::from(claim_id))
        .await?;
    Ok(Json(ClaimStatusResponse {
        id: claim.id.to_string(),
        status: claim.status,
    }))
}
