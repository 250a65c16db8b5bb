//! Request correlation middleware.
//!
//! Every request gets a correlation identifier: the caller-supplied
//! `X-Request-Id` header when present, a generated UUID otherwise. The id is
//! echoed back on the response and scoped into a task-local so the error
//! mapper can stamp it into problem bodies as `instance`.

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;

/// Header carrying the request correlation identifier.
pub const X_REQUEST_ID: &str = "x-request-id";

tokio::task_local! {
    static REQUEST_ID: String;
}

/// The correlation identifier of the current request, when one is in scope.
#[must_use]
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(Clone::clone).ok()
}

/// Axum middleware that assigns and echoes the request correlation id.
///
/// Also sets the static rate-limit advisory headers the API contract
/// promises on every response.
pub async fn propagate_request_id(req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), ToOwned::to_owned);

    let mut response = REQUEST_ID.scope(id.clone(), next.run(req)).await;

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&id) {
        headers.insert(X_REQUEST_ID, value);
    }
    headers
        .entry("x-ratelimit-limit")
        .or_insert(HeaderValue::from_static("60"));
    headers
        .entry("x-ratelimit-remaining")
        .or_insert(HeaderValue::from_static("60"));

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn request_id_is_scoped_to_the_task() {
        assert!(current_request_id().is_none());

        REQUEST_ID
            .scope("req-1".to_owned(), async {
                assert_eq!(current_request_id().as_deref(), Some("req-1"));
            })
            .await;

        assert!(current_request_id().is_none());
    }
}
