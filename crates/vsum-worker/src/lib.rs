//! Job pipeline and worker pool.
//!
//! [`JobPipeline`] is the state machine of the service: it takes one
//! [`vsum_queue::ExtractionJob`], runs extraction, uploads the
//! artifact, derives the summary when asked, and commits exactly one
//! terminal state to the job store. [`JobExecutor`] drives pipelines
//! off the queue with a bounded worker pool.

pub mod config;
pub mod error;
pub mod executor;
pub mod pipeline;
pub mod summarizer;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use executor::JobExecutor;
pub use pipeline::JobPipeline;
pub use summarizer::{DemoSummarizer, SummarizeError, Summarizer};
