//! SSE job progress streaming.
//!
//! `GET /v1/stream/jobs/{job_id}` polls the job store on a fixed interval
//! and emits a `progress` event whenever the percentage changes, then a
//! final `done` event carrying the terminal status. The loop ends itself at
//! the terminal state; an abandoned stream is cleaned up by the transport
//! disconnect.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::response::sse::{Event, KeepAlive, Sse};

use claimdesk_core::{JobId, UserId};
use claimdesk_state::store::JobStore;

use crate::auth::identity::CallerIdentity;
use crate::error::{ApiError, Problem};

use super::AppState;

/// How often the stream re-reads the job.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

struct PollState {
    jobs: Arc<dyn JobStore>,
    owner: UserId,
    job_id: JobId,
    last_progress: Option<u8>,
    finished: bool,
}

/// `GET /v1/stream/jobs/{job_id}` -- subscribe to a job's progress via SSE.
#[utoipa::path(
    get,
    path = "/v1/stream/jobs/{job_id}",
    tag = "Jobs",
    summary = "Stream job progress",
    params(("job_id" = String, Path, description = "Job identifier")),
    responses(
        (status = 200, description = "SSE stream of `progress` events and a final `done` event"),
        (status = 401, description = "Unauthenticated", body = Problem),
        (status = 404, description = "Unknown or foreign job", body = Problem)
    )
)]
pub async fn stream_job(
    State(state): State<AppState>,
    axum::Extension(identity): axum::Extension<CallerIdentity>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let owner = identity.user_id();
    let job_id = JobId::from(job_id);

    // Ownership check before the stream opens, so an unknown or foreign job
    // is a 404 rather than an empty stream.
    state.engine.jobs().get(&owner, &job_id).await?;

    let poll = PollState {
        jobs: Arc::clone(state.engine.jobs()),
        owner,
        job_id,
        last_progress: None,
        finished: false,
    };

    let stream = futures::stream::unfold(poll, |mut poll| async move {
        if poll.finished {
            return None;
        }
        loop {
            // The job disappearing mid-stream ends the stream; the memory
            // store never drops records, so this is a backend-swap guard.
            let Ok(job) = poll.jobs.get(&poll.owner, &poll.job_id).await else {
                poll.finished = true;
                return None;
            };

            if poll.last_progress != Some(job.progress) {
                poll.last_progress = Some(job.progress);
                let event = Event::default()
                    .event("progress")
                    .data(job.progress.to_string());
                return Some((Ok::<_, Infallible>(event), poll));
            }

            if job.status.is_terminal() {
                poll.finished = true;
                let event = Event::default().event("done").data(job.status.as_str());
                return Some((Ok(event), poll));
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    });

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    ))
}
