//! Worker configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Worker pool and pipeline configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Scratch directory; each job gets its own subdirectory
    pub work_dir: PathBuf,
    /// Maximum pipelines running at once
    pub max_concurrent_jobs: usize,
    /// Wall-clock budget per pipeline run; on expiry the job is
    /// committed as failed with a timeout reason
    pub job_timeout: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            work_dir: std::env::temp_dir().join("vsum"),
            max_concurrent_jobs: 2,
            job_timeout: Duration::from_secs(30 * 60),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            work_dir: std::env::var("VSUM_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
            max_concurrent_jobs: std::env::var("VSUM_MAX_CONCURRENT_JOBS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_concurrent_jobs),
            job_timeout: std::env::var("VSUM_JOB_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.job_timeout),
        }
    }
}
