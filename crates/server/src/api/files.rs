use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use claimdesk_core::{ClaimdeskError, FileId};
use claimdesk_engine::{NewFileUpload, run_idempotent};

use crate::auth::identity::CallerIdentity;
use crate::error::{ApiError, Problem};

use super::schemas::{CreateFileRequest, CreateFileResponse, FileResponse};
use super::{AppState, idempotency_key};

/// `POST /v1/files` -- open an upload slot for a new file.
///
/// Honors the `Idempotency-Key` header: retries with the same key receive
/// the originally issued slot instead of a fresh file record.
#[utoipa::path(
    post,
    path = "/v1/files",
    tag = "Files",
    summary = "Create upload slot",
    request_body = CreateFileRequest,
    responses(
        (status = 201, description = "Upload slot issued", body = CreateFileResponse),
        (status = 401, description = "Unauthenticated", body = Problem),
        (status = 503, description = "Object storage unavailable", body = Problem)
    )
)]
pub async fn create_file_slot(
    State(state): State<AppState>,
    axum::Extension(identity): axum::Extension<CallerIdentity>,
    headers: HeaderMap,
    Json(payload): Json<CreateFileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let caller = identity.user_id();
    let key = idempotency_key(&headers);

    let value = run_idempotent(
        state.engine.idempotency().as_ref(),
        &caller,
        key.as_deref(),
        || {
            let state = state.clone();
            let caller = caller.clone();
            let payload = payload.clone();
            async move {
                let ticket = state
                    .engine
                    .storage()
                    .create_upload_slot(
                        &caller,
                        NewFileUpload {
                            purpose: payload.purpose,
                            content_type: payload.content_type,
                            filename: payload.filename,
                            size: payload.bytes,
                        },
                    )
                    .await?;
                serde_json::to_value(CreateFileResponse::new(&ticket.file, ticket.slot))
                    .map_err(|err| ClaimdeskError::Unavailable(err.to_string()))
            }
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(value)))
}

/// `POST /v1/files/{file_id}/complete` -- finish the upload and scan it.
#[utoipa::path(
    post,
    path = "/v1/files/{file_id}/complete",
    tag = "Files",
    summary = "Complete upload",
    params(("file_id" = String, Path, description = "File identifier")),
    responses(
        (status = 202, description = "Scan finished; file is ready or failed", body = FileResponse),
        (status = 404, description = "Unknown or foreign file", body = Problem),
        (status = 409, description = "File is not awaiting completion", body = Problem),
        (status = 503, description = "Scanner unavailable", body = Problem)
    )
)]
pub async fn complete_upload(
    State(state): State<AppState>,
    axum::Extension(identity): axum::Extension<CallerIdentity>,
    Path(file_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let caller = identity.user_id();
    let file = state
        .engine
        .storage()
        .complete_upload(&caller, &FileId::from(file_id))
        .await
        .map_err(ApiError)?;
    Ok((StatusCode::ACCEPTED, Json(FileResponse::from(file))))
}

/// `GET /v1/files/{file_id}` -- fetch file metadata.
#[utoipa::path(
    get,
    path = "/v1/files/{file_id}",
    tag = "Files",
    summary = "Get file",
    params(("file_id" = String, Path, description = "File identifier")),
    responses(
        (status = 200, description = "File metadata", body = FileResponse),
        (status = 404, description = "Unknown or foreign file", body = Problem)
    )
)]
pub async fn get_file(
    State(state): State<AppState>,
    axum::Extension(identity): axum::Extension<CallerIdentity>,
    Path(file_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let caller = identity.user_id();
    let file = state
        .engine
        .storage()
        .get_file(&caller, &FileId::from(file_id))
        .await
        .map_err(ApiError)?;
    Ok(Json(FileResponse::from(file)))
}
