//! Wire shapes for the submit and poll endpoints.

use serde::{Deserialize, Serialize};

use crate::job::{Deliverable, Job, JobStatus};

/// Request body for `POST /api/jobs`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRequest {
    /// Raw video URL (untrusted)
    pub url: String,
    /// Requested deliverable; defaults to a text summary
    #[serde(default)]
    pub deliverable: Deliverable,
}

/// Response body for a successful submit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub job_id: String,
}

/// Response body for `GET /api/jobs/{job_id}`.
///
/// `{ready: false}` covers both "still processing" and "unknown job id";
/// terminal jobs always serialize to the same bytes on repeated polls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollResponse {
    pub ready: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_payload: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl PollResponse {
    /// The not-ready response.
    pub fn pending() -> Self {
        Self {
            ready: false,
            status: None,
            artifact_url: None,
            result_payload: None,
            failure_reason: None,
        }
    }

    /// Build the poll response for a job's current state.
    pub fn from_job(job: &Job) -> Self {
        match job.status {
            JobStatus::Processing => Self::pending(),
            JobStatus::Completed => Self {
                ready: true,
                status: Some(JobStatus::Completed),
                artifact_url: job.artifact_url.clone(),
                result_payload: job.result_payload.clone(),
                failure_reason: None,
            },
            JobStatus::Failed => Self {
                ready: true,
                status: Some(JobStatus::Failed),
                artifact_url: None,
                result_payload: None,
                failure_reason: job.failure_reason.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_serializes_to_ready_false_only() {
        let json = serde_json::to_string(&PollResponse::pending()).unwrap();
        assert_eq!(json, r#"{"ready":false}"#);
    }

    #[test]
    fn processing_job_reads_as_pending() {
        let job = Job::new("https://example.com/v", Deliverable::Audio);
        assert_eq!(PollResponse::from_job(&job), PollResponse::pending());
    }

    #[test]
    fn completed_job_carries_artifact_and_payload() {
        let job = Job::new("https://example.com/v", Deliverable::Summary).complete(
            Some("https://cdn.example/artifact/abc.mp3".into()),
            Some("A short summary.".into()),
        );
        let resp = PollResponse::from_job(&job);
        assert!(resp.ready);
        assert_eq!(resp.status, Some(JobStatus::Completed));
        assert_eq!(
            resp.artifact_url.as_deref(),
            Some("https://cdn.example/artifact/abc.mp3")
        );
        assert_eq!(resp.result_payload.as_deref(), Some("A short summary."));
        assert!(resp.failure_reason.is_none());
    }

    #[test]
    fn failed_job_carries_reason_only() {
        let job =
            Job::new("https://example.com/v", Deliverable::Audio).fail("ExtractionFailed: exit 1");
        let resp = PollResponse::from_job(&job);
        assert!(resp.ready);
        assert_eq!(resp.status, Some(JobStatus::Failed));
        assert!(resp.artifact_url.is_none());
        assert_eq!(resp.failure_reason.as_deref(), Some("ExtractionFailed: exit 1"));
    }

    #[test]
    fn terminal_response_is_byte_stable() {
        let job = Job::new("https://example.com/v", Deliverable::Audio)
            .complete(Some("https://cdn.example/a.mp3".into()), None);
        let first = serde_json::to_string(&PollResponse::from_job(&job)).unwrap();
        let second = serde_json::to_string(&PollResponse::from_job(&job)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn submit_request_defaults_to_summary() {
        let req: SubmitRequest =
            serde_json::from_str(r#"{"url":"https://example.com/v"}"#).unwrap();
        assert_eq!(req.deliverable, Deliverable::Summary);
    }
}
