//! The job store trait.

use async_trait::async_trait;

use vsum_models::{Job, JobId};

use crate::error::StoreResult;

/// Durable mapping from job id to job record.
///
/// Implementations must make `complete`/`fail` atomic: the terminal
/// status and its result fields are committed in one update, and a job
/// that already reached a terminal state must be left untouched
/// (`StoreError::AlreadyTerminal`).
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Persist a new job record. Fails if the id already exists.
    async fn create(&self, job: Job) -> StoreResult<()>;

    /// Read a job by id. `None` when the id is unknown.
    async fn get(&self, id: &JobId) -> StoreResult<Option<Job>>;

    /// Atomically commit `processing -> completed` with result fields.
    async fn complete(
        &self,
        id: &JobId,
        artifact_url: Option<String>,
        result_payload: Option<String>,
    ) -> StoreResult<Job>;

    /// Atomically commit `processing -> failed` with a diagnostic.
    async fn fail(&self, id: &JobId, reason: &str) -> StoreResult<Job>;
}
