//! In-process job queue.
//!
//! Submit enqueues an [`ExtractionJob`]; the worker pool consumes it
//! from the paired [`JobReceiver`]. The channel is bounded, so queue
//! depth is the backpressure limit: a full queue rejects the submission
//! instead of letting work pile up unbounded.

pub mod error;
pub mod job;
pub mod queue;

pub use error::{QueueError, QueueResult};
pub use job::ExtractionJob;
pub use queue::{job_channel, JobQueue, JobReceiver};
