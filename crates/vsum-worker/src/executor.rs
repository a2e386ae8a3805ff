//! Worker pool driving pipelines off the queue.

use std::sync::Arc;

use tokio::sync::{watch, Semaphore};
use tracing::info;

use vsum_queue::JobReceiver;

use crate::pipeline::JobPipeline;

/// Consumes the job queue and runs pipelines with bounded concurrency.
pub struct JobExecutor {
    pipeline: Arc<JobPipeline>,
    semaphore: Arc<Semaphore>,
    max_concurrent_jobs: usize,
    shutdown: watch::Sender<bool>,
}

impl JobExecutor {
    pub fn new(pipeline: Arc<JobPipeline>, max_concurrent_jobs: usize) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            pipeline,
            semaphore: Arc::new(Semaphore::new(max_concurrent_jobs)),
            max_concurrent_jobs,
            shutdown,
        }
    }

    /// Signal the executor to stop consuming new jobs.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Run until the queue closes or shutdown is signalled, then drain
    /// in-flight jobs.
    pub async fn run(&self, mut receiver: JobReceiver) {
        info!(
            max_concurrent_jobs = self.max_concurrent_jobs,
            "starting job executor"
        );

        let mut shutdown_rx = self.shutdown.subscribe();

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("shutdown signal received, stopping executor");
                        break;
                    }
                }
                maybe_job = receiver.recv() => {
                    let Some(job) = maybe_job else {
                        info!("job queue closed, stopping executor");
                        break;
                    };

                    // The semaphore is never closed, so acquisition only
                    // fails if the runtime is tearing down.
                    let Ok(permit) = Arc::clone(&self.semaphore).acquire_owned().await else {
                        break;
                    };
                    let pipeline = Arc::clone(&self.pipeline);
                    tokio::spawn(async move {
                        let _permit = permit;
                        pipeline.process(job).await;
                    });
                }
            }
        }

        // Drain: once all permits are back, no pipeline is in flight.
        info!("waiting for in-flight jobs to complete");
        let _ = self
            .semaphore
            .acquire_many(self.max_concurrent_jobs as u32)
            .await;
        info!("job executor stopped");
    }
}
