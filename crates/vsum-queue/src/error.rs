//! Queue error types.

use thiserror::Error;

/// Result type for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// Errors that can occur when enqueueing work.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue is full ({capacity} jobs pending)")]
    Full { capacity: usize },

    #[error("queue is closed, worker pool is gone")]
    Closed,
}
