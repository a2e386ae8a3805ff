//! Shared data models for the vsum backend.
//!
//! This crate defines the job record and its lifecycle, the deliverable
//! kinds, source URL normalization, and the wire shapes of the submit
//! and poll endpoints. It has no I/O; every other crate depends on it.

pub mod job;
pub mod response;
pub mod source_url;

pub use job::{Deliverable, Job, JobId, JobStatus};
pub use response::{PollResponse, SubmitRequest, SubmitResponse};
pub use source_url::{normalize_source_url, SourceUrlError};
