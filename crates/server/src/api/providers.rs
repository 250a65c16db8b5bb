use axum::Json;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;

use claimdesk_core::{PageLimit, decode_cursor, encode_cursor};
use claimdesk_engine::validate_policy_number;

use crate::auth::identity::CallerIdentity;
use crate::error::{ApiError, Problem};

use super::AppState;
use super::schemas::{
    InsurerListResponse, InsurerResponse, PolicyValidationRequest, PolicyValidationResult,
};

/// Query parameters for the insurer search endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct SearchQuery {
    /// Substring matched against insurer names and ids.
    #[serde(default)]
    pub q: String,
    /// Page size, 1-100.
    pub limit: Option<usize>,
    /// Opaque cursor from a previous page.
    pub cursor: Option<String>,
}

/// `GET /v1/providers` -- search the insurer directory.
#[utoipa::path(
    get,
    path = "/v1/providers",
    tag = "Providers",
    summary = "Search insurers",
    params(
        ("q" = Option<String>, Query, description = "Name or id substring"),
        ("limit" = Option<usize>, Query, description = "Page size (1-100)"),
        ("cursor" = Option<String>, Query, description = "Opaque cursor from a previous page")
    ),
    responses(
        (status = 200, description = "Matching insurers", body = InsurerListResponse),
        (status = 401, description = "Unauthenticated", body = Problem),
        (status = 422, description = "Invalid limit or cursor", body = Problem)
    )
)]
pub async fn search_providers(
    State(state): State<AppState>,
    axum::Extension(_identity): axum::Extension<CallerIdentity>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
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

    let page = state.engine.directory().search(&query.q, limit, after).await?;

    Ok(Json(InsurerListResponse {
        items: page.items.into_iter().map(InsurerResponse::from).collect(),
        next_cursor: page.next_after.as_deref().map(encode_cursor),
    }))
}

/// `POST /v1/providers/validate-policy` -- check a policy number's format.
#[utoipa::path(
    post,
    path = "/v1/providers/validate-policy",
    tag = "Providers",
    summary = "Validate policy number",
    request_body = PolicyValidationRequest,
    responses(
        (status = 200, description = "Validation verdict", body = PolicyValidationResult),
        (status = 401, description = "Unauthenticated", body = Problem)
    )
)]
pub async fn validate_policy(
    State(_state): State<AppState>,
    axum::Extension(_identity): axum::Extension<CallerIdentity>,
    Json(payload): Json<PolicyValidationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let validation = validate_policy_number(&payload.policy_number);
    Ok(Json(PolicyValidationResult::from(validation)))
}
