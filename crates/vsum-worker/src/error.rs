//! Worker error types and failure classification.

use std::time::Duration;

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

/// Errors that end a pipeline run.
///
/// Every variant maps to a `failed` commit with a reason string whose
/// prefix names the failure class; the suffix keeps the distinguishing
/// detail.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("extraction failed: {0}")]
    ExtractionFailed(#[from] vsum_media::MediaError),

    #[error("upload failed: {0}")]
    UploadFailed(#[from] vsum_storage::StorageError),

    #[error("result derivation failed: {0}")]
    DerivationFailed(String),

    #[error("pipeline exceeded wall-clock budget of {0:?}")]
    Timeout(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    /// Human-readable diagnostic committed to the job record.
    pub fn failure_reason(&self) -> String {
        match self {
            WorkerError::ExtractionFailed(e) => format!("ExtractionFailed: {e}"),
            WorkerError::UploadFailed(e) => format!("UploadFailed: {e}"),
            WorkerError::DerivationFailed(detail) => format!("DerivationFailed: {detail}"),
            WorkerError::Timeout(budget) => {
                format!("Timeout: pipeline exceeded {}s budget", budget.as_secs())
            }
            WorkerError::Io(e) => format!("PipelineFailed: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_are_prefixed_by_class() {
        let err = WorkerError::ExtractionFailed(vsum_media::MediaError::MissingOutput(
            "/tmp/x.mp3".into(),
        ));
        assert!(err.failure_reason().starts_with("ExtractionFailed: "));

        let err = WorkerError::UploadFailed(vsum_storage::StorageError::upload_failed("503"));
        assert!(err.failure_reason().starts_with("UploadFailed: "));

        let err = WorkerError::Timeout(Duration::from_secs(60));
        assert_eq!(
            err.failure_reason(),
            "Timeout: pipeline exceeded 60s budget"
        );
    }
}
