//! In-memory job store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use vsum_models::{Job, JobId};

use crate::error::{StoreError, StoreResult};
use crate::job_store::JobStore;

/// In-process job store backed by a `HashMap`.
///
/// Jobs are never deleted; retention is an external concern.
#[derive(Clone, Default)]
pub struct MemoryJobStore {
    jobs: Arc<RwLock<HashMap<JobId, Job>>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored jobs (terminal or not).
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }

    /// Snapshot of all records, in no particular order.
    pub async fn all(&self) -> Vec<Job> {
        self.jobs.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn create(&self, job: Job) -> StoreResult<()> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(StoreError::AlreadyExists(job.id.clone()));
        }
        debug!(job_id = %job.id, deliverable = %job.deliverable, "created job record");
        jobs.insert(job.id.clone(), job);
        Ok(())
    }

    async fn get(&self, id: &JobId) -> StoreResult<Option<Job>> {
        Ok(self.jobs.read().await.get(id).cloned())
    }

    async fn complete(
        &self,
        id: &JobId,
        artifact_url: Option<String>,
        result_payload: Option<String>,
    ) -> StoreResult<Job> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        if job.is_terminal() {
            return Err(StoreError::AlreadyTerminal(id.clone()));
        }
        let job = job.complete(artifact_url, result_payload);
        jobs.insert(id.clone(), job.clone());
        Ok(job)
    }

    async fn fail(&self, id: &JobId, reason: &str) -> StoreResult<Job> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        if job.is_terminal() {
            return Err(StoreError::AlreadyTerminal(id.clone()));
        }
        let job = job.fail(reason);
        jobs.insert(id.clone(), job.clone());
        Ok(job)
    }
}
