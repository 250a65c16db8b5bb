use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;

use crate::auth::identity::CallerIdentity;
use crate::error::{ApiError, Problem};

use super::AppState;
use super::schemas::UserResponse;

/// `GET /v1/users/me` -- the authenticated caller's profile.
///
/// Also refreshes the stored profile so the email of record tracks the
/// identity provider.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    summary = "Current user",
    responses(
        (status = 200, description = "Caller profile", body = UserResponse),
        (status = 401, description = "Unauthenticated", body = Problem)
    )
)]
pub async fn me(
    State(state): State<AppState>,
    axum::Extension(identity): axum::Extension<CallerIdentity>,
) -> Result<impl IntoResponse, ApiError> {
    let caller = state.engine.users().upsert(identity.to_caller()).await?;
    Ok(Json(UserResponse {
        id: caller.id.to_string(),
        email: caller.email,
    }))
}
