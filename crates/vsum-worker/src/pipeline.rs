//! The job pipeline state machine.
//!
//! Per job, strictly in order: extraction, artifact upload, result
//! derivation, one terminal commit. Any failure along the way
//! short-circuits to a `failed` commit with a classified diagnostic.
//! The per-job scratch directory is removed on every exit path.

use std::path::Path;
use std::sync::Arc;

use metrics::{counter, histogram};
use tracing::{error, info, warn};

use vsum_media::MediaExtractor;
use vsum_queue::ExtractionJob;
use vsum_storage::ArtifactStore;
use vsum_store::JobStore;

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::summarizer::Summarizer;

/// Result fields carried into the `completed` commit.
struct PipelineOutput {
    artifact_url: Option<String>,
    result_payload: Option<String>,
}

/// Orchestrates one job from extraction to terminal commit.
///
/// All collaborators are injected; the pipeline holds no mutable state
/// of its own, so one instance serves any number of concurrent jobs.
pub struct JobPipeline {
    store: Arc<dyn JobStore>,
    artifacts: Arc<dyn ArtifactStore>,
    extractor: Arc<dyn MediaExtractor>,
    summarizer: Arc<dyn Summarizer>,
    config: WorkerConfig,
}

impl JobPipeline {
    pub fn new(
        store: Arc<dyn JobStore>,
        artifacts: Arc<dyn ArtifactStore>,
        extractor: Arc<dyn MediaExtractor>,
        summarizer: Arc<dyn Summarizer>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            store,
            artifacts,
            extractor,
            summarizer,
            config,
        }
    }

    /// Run the pipeline for one job and commit its terminal state.
    ///
    /// Never returns an error: every failure, including the wall-clock
    /// timeout, resolves the job to `failed`. The one exception is a
    /// failing commit itself, which is logged and leaves the job in
    /// `processing` for the client-side timeout to catch.
    pub async fn process(&self, job: ExtractionJob) {
        info!(
            job_id = %job.job_id,
            deliverable = %job.deliverable,
            url = %job.source_url,
            "processing job"
        );

        let work_dir = self.config.work_dir.join(job.job_id.as_str());

        let result = match tokio::fs::create_dir_all(&work_dir).await {
            Err(e) => Err(WorkerError::Io(e)),
            Ok(()) => {
                // The timeout wraps only the work; scratch cleanup below
                // runs regardless of how the work ended.
                match tokio::time::timeout(self.config.job_timeout, self.run(&job, &work_dir))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(WorkerError::Timeout(self.config.job_timeout)),
                }
            }
        };

        if let Err(e) = tokio::fs::remove_dir_all(&work_dir).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(job_id = %job.job_id, error = %e, "failed to remove scratch directory");
            }
        }

        self.commit(&job, result).await;
    }

    /// Steps 1-3: extraction, upload, derivation.
    async fn run(&self, job: &ExtractionJob, work_dir: &Path) -> WorkerResult<PipelineOutput> {
        let started = std::time::Instant::now();
        let local = self
            .extractor
            .extract(&job.source_url, job.deliverable, work_dir)
            .await?;
        histogram!("vsum_extraction_duration_seconds").record(started.elapsed().as_secs_f64());

        let key = format!(
            "artifacts/{}.{}",
            job.job_id,
            job.deliverable.extension()
        );
        let started = std::time::Instant::now();
        let artifact_url = self
            .artifacts
            .upload(&local, &key, job.deliverable.content_type())
            .await?;
        histogram!("vsum_upload_duration_seconds").record(started.elapsed().as_secs_f64());

        let result_payload = if job.deliverable.has_text_result() {
            let text = self
                .summarizer
                .summarize(&job.source_url, &local)
                .await
                .map_err(|e| WorkerError::DerivationFailed(e.to_string()))?;
            Some(text)
        } else {
            None
        };

        Ok(PipelineOutput {
            artifact_url: Some(artifact_url),
            result_payload,
        })
    }

    /// Step 4: exactly one atomic terminal commit.
    async fn commit(&self, job: &ExtractionJob, result: WorkerResult<PipelineOutput>) {
        let commit = match result {
            Ok(output) => {
                counter!("vsum_jobs_completed_total").increment(1);
                self.store
                    .complete(&job.job_id, output.artifact_url, output.result_payload)
                    .await
            }
            Err(e) => {
                counter!("vsum_jobs_failed_total").increment(1);
                let reason = e.failure_reason();
                warn!(job_id = %job.job_id, %reason, "job failed");
                self.store.fail(&job.job_id, &reason).await
            }
        };

        match commit {
            Ok(committed) => {
                info!(job_id = %job.job_id, status = %committed.status, "job committed");
            }
            Err(e) => {
                // Storage unavailable at commit time: the job stays in
                // `processing` and the client's poll loop times out.
                error!(job_id = %job.job_id, error = %e, "terminal commit failed");
            }
        }
    }
}
