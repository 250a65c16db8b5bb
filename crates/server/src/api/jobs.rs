use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

use claimdesk_core::JobId;

use crate::auth::identity::CallerIdentity;
use crate::error::{ApiError, Problem};

use super::AppState;
use super::schemas::JobResponse;

/// `GET /v1/jobs/{job_id}` -- poll a job's lifecycle state.
///
/// Reads never mutate the job; callers poll this until the status is
/// terminal (or subscribe to the SSE stream instead).
#[utoipa::path(
    get,
    path = "/v1/jobs/{job_id}",
    tag = "Jobs",
    summary = "Get job",
    params(("job_id" = String, Path, description = "Job identifier")),
    responses(
        (status = 200, description = "The job", body = JobResponse),
        (status = 401, description = "Unauthenticated", body = Problem),
        (status = 404, description = "Unknown or foreign job", body = Problem)
    )
)]
pub async fn get_job(
    State(state): State<AppState>,
    axum::Extension(identity): axum::Extension<CallerIdentity>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let caller = identity.user_id();
    let job = state
        .engine
        .jobs()
        .get(&caller, &JobId::from(job_id))
        .await?;
    Ok(Json(JobResponse::from(job)))
}
