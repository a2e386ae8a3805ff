//! Job submit and poll handlers.

use axum::extract::{Path, State};
use axum::Json;
use metrics::counter;
use tracing::{info, warn};

use vsum_models::{normalize_source_url, Job, JobId, PollResponse, SubmitRequest, SubmitResponse};
use vsum_queue::ExtractionJob;

use crate::error::{ApiError, ApiResult};
use crate::metrics::names;
use crate::state::AppState;

/// Submit a video URL for processing.
///
/// Validation and normalization happen before any side effect: an
/// unparseable URL yields a 400 and no job record. On the accepted
/// path there is exactly one store write; the job is visible to poll,
/// in `processing`, before this handler returns.
pub async fn submit_job(
    State(state): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> ApiResult<Json<SubmitResponse>> {
    let source_url = normalize_source_url(&request.url).map_err(|e| {
        counter!(names::JOBS_REJECTED_TOTAL).increment(1);
        ApiError::validation(e.to_string())
    })?;

    let job = Job::new(source_url, request.deliverable);
    let work = ExtractionJob::for_job(&job);
    let job_id = job.id.clone();

    state.store.create(job).await?;

    if let Err(e) = state.queue.enqueue(work) {
        // The record already exists; commit it failed rather than leave
        // a processing job no worker will ever pick up.
        warn!(job_id = %job_id, error = %e, "could not enqueue job");
        counter!(names::JOBS_REJECTED_TOTAL).increment(1);
        if let Err(commit_err) = state
            .store
            .fail(&job_id, "QueueRejected: no worker capacity")
            .await
        {
            warn!(job_id = %job_id, error = %commit_err, "failed to mark rejected job");
        }
        return Err(e.into());
    }

    counter!(names::JOBS_SUBMITTED_TOTAL).increment(1);
    info!(job_id = %job_id, "accepted job");

    Ok(Json(SubmitResponse {
        job_id: job_id.to_string(),
    }))
}

/// Poll a job's state.
///
/// An unknown job id reads the same as a job still in `processing`:
/// `{ready: false}`. Terminal jobs return their full payload, stable
/// across repeated polls.
pub async fn poll_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<PollResponse>> {
    let id = JobId::from_string(job_id);
    let response = match state.store.get(&id).await? {
        Some(job) => PollResponse::from_job(&job),
        None => PollResponse::pending(),
    };
    Ok(Json(response))
}
