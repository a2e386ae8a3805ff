//! Queue job payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vsum_models::{Deliverable, Job, JobId};

/// One unit of pipeline work: run extraction for a submitted job.
///
/// Carries only what the pipeline needs; the job record itself lives in
/// the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionJob {
    /// Id of the job record created at submission
    pub job_id: JobId,
    /// Normalized source URL
    pub source_url: String,
    /// Requested deliverable kind
    pub deliverable: Deliverable,
    /// When the work was enqueued
    pub created_at: DateTime<Utc>,
}

impl ExtractionJob {
    pub fn new(
        job_id: JobId,
        source_url: impl Into<String>,
        deliverable: Deliverable,
    ) -> Self {
        Self {
            job_id,
            source_url: source_url.into(),
            deliverable,
            created_at: Utc::now(),
        }
    }

    /// Build the work item for a freshly created job record.
    pub fn for_job(job: &Job) -> Self {
        Self::new(job.id.clone(), job.source_url.clone(), job.deliverable)
    }
}
