//! Bounded job channel.

use tokio::sync::mpsc;
use tracing::debug;

use crate::error::{QueueError, QueueResult};
use crate::job::ExtractionJob;

/// Sending half, held by the API.
#[derive(Clone)]
pub struct JobQueue {
    tx: mpsc::Sender<ExtractionJob>,
    capacity: usize,
}

/// Receiving half, consumed by the worker pool.
pub struct JobReceiver {
    rx: mpsc::Receiver<ExtractionJob>,
}

/// Create a queue with the given backpressure capacity.
pub fn job_channel(capacity: usize) -> (JobQueue, JobReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (JobQueue { tx, capacity }, JobReceiver { rx })
}

impl JobQueue {
    /// Offer a job to the queue without waiting.
    ///
    /// A full queue is a backpressure signal surfaced to the submitter,
    /// not something to block the request on.
    pub fn enqueue(&self, job: ExtractionJob) -> QueueResult<()> {
        debug!(job_id = %job.job_id, deliverable = %job.deliverable, "enqueueing job");
        self.tx.try_send(job).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => QueueError::Full {
                capacity: self.capacity,
            },
            mpsc::error::TrySendError::Closed(_) => QueueError::Closed,
        })
    }

    /// Configured backpressure capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl JobReceiver {
    /// Receive the next job; `None` once all senders are gone.
    pub async fn recv(&mut self) -> Option<ExtractionJob> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vsum_models::{Deliverable, JobId};

    fn job() -> ExtractionJob {
        ExtractionJob::new(JobId::new(), "https://example.com/v", Deliverable::Audio)
    }

    #[tokio::test]
    async fn enqueue_then_recv_preserves_order() {
        let (queue, mut rx) = job_channel(4);
        let a = job();
        let b = job();
        queue.enqueue(a.clone()).unwrap();
        queue.enqueue(b.clone()).unwrap();

        assert_eq!(rx.recv().await.unwrap().job_id, a.job_id);
        assert_eq!(rx.recv().await.unwrap().job_id, b.job_id);
    }

    #[tokio::test]
    async fn full_queue_rejects_without_blocking() {
        let (queue, _rx) = job_channel(1);
        queue.enqueue(job()).unwrap();
        assert!(matches!(
            queue.enqueue(job()),
            Err(QueueError::Full { capacity: 1 })
        ));
    }

    #[tokio::test]
    async fn closed_queue_is_reported() {
        let (queue, rx) = job_channel(1);
        drop(rx);
        assert!(matches!(queue.enqueue(job()), Err(QueueError::Closed)));
    }
}
