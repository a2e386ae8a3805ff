//! Durable artifact storage.
//!
//! The pipeline hands a local file to the [`ArtifactStore`] trait and
//! gets back a publicly addressable URL. [`R2Client`] is the production
//! implementation against an S3-compatible endpoint (Cloudflare R2).
//! No internal retries: upload failures propagate to the pipeline,
//! which commits the job as failed.

pub mod client;
pub mod error;
pub mod store;

pub use client::{R2Client, R2Config};
pub use error::{StorageError, StorageResult};
pub use store::ArtifactStore;
