//! The artifact store trait.

use std::path::Path;

use async_trait::async_trait;

use crate::error::StorageResult;

/// Stores a local byte stream durably and returns a reference URL.
///
/// One upload call per successfully extracted artifact; the returned
/// URL is embedded verbatim in the job record.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Upload the file at `local_path` under `key`.
    ///
    /// Returns the durable, publicly addressable URL of the artifact.
    async fn upload(
        &self,
        local_path: &Path,
        key: &str,
        content_type: &str,
    ) -> StorageResult<String>;
}
