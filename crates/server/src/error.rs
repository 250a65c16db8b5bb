use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use claimdesk_core::{ClaimdeskError, FieldError};
use claimdesk_state::StoreError;

use crate::request_id::current_request_id;

/// Structured-problem response body, stamped with the request correlation id.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct Problem {
    /// Problem type URI; always `about:blank` for this API.
    #[serde(rename = "type")]
    pub kind: String,
    /// Short human-readable summary of the problem class.
    pub title: String,
    /// HTTP status code, duplicated into the body.
    pub status: u16,
    /// Human-readable explanation specific to this occurrence.
    pub detail: Option<String>,
    /// Request correlation id, for support-ticket lookup.
    pub instance: String,
    /// Field-level validation failures, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// Error wrapper mapping the domain taxonomy onto HTTP once, at the boundary.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub ClaimdeskError);

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self(ClaimdeskError::from(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, title, detail, errors) = match self.0 {
            ClaimdeskError::Unauthenticated(detail) => (
                StatusCode::UNAUTHORIZED,
                "Unauthenticated",
                Some(detail),
                None,
            ),
            ClaimdeskError::NotFound(entity) => (
                StatusCode::NOT_FOUND,
                "Not Found",
                Some(format!("{entity} not found")),
                None,
            ),
            ClaimdeskError::ValidationFailed(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation Error",
                Some("Input validation failed".to_owned()),
                Some(fields),
            ),
            ClaimdeskError::Conflict(detail) => {
                (StatusCode::CONFLICT, "Conflict", Some(detail), None)
            }
            ClaimdeskError::Unavailable(detail) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Upstream Unavailable",
                Some(detail),
                None,
            ),
            ClaimdeskError::NotImplemented(detail) => (
                StatusCode::NOT_IMPLEMENTED,
                "Not Implemented",
                Some(detail),
                None,
            ),
        };

        let body = Problem {
            kind: "about:blank".to_owned(),
            title: title.to_owned(),
            status: status.as_u16(),
            detail,
            instance: current_request_id().unwrap_or_default(),
            errors,
        };

        (status, Json(body)).into_response()
    }
}
