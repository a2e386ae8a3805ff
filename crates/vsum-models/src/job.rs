//! Job record and lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a job.
///
/// Backed by a UUID v4 so ids stay unique even for submissions that
/// land within the same millisecond.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Job status. Closed enum: no other states exist.
///
/// Transitions are one-directional: `Processing -> Completed` or
/// `Processing -> Failed`. Terminal states never transition again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job accepted, pipeline not yet finished
    #[default]
    Processing,
    /// Pipeline finished successfully
    Completed,
    /// Pipeline finished with an error
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the client asked to be derived from the source video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Deliverable {
    /// MP3 audio extract
    Audio,
    /// 720p MP4 transcode
    Video,
    /// Text summary (audio is extracted as an intermediate)
    #[default]
    Summary,
}

impl Deliverable {
    /// File extension yt-dlp is asked to produce for this deliverable.
    pub fn extension(&self) -> &'static str {
        match self {
            Deliverable::Video => "mp4",
            Deliverable::Audio | Deliverable::Summary => "mp3",
        }
    }

    /// Content type of the produced artifact.
    pub fn content_type(&self) -> &'static str {
        match self {
            Deliverable::Video => "video/mp4",
            Deliverable::Audio | Deliverable::Summary => "audio/mpeg",
        }
    }

    /// Whether this deliverable carries a textual result payload.
    pub fn has_text_result(&self) -> bool {
        matches!(self, Deliverable::Summary)
    }
}

impl fmt::Display for Deliverable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Deliverable::Audio => "audio",
            Deliverable::Video => "video",
            Deliverable::Summary => "summary",
        };
        f.write_str(s)
    }
}

/// The unit of work and the only persisted entity.
///
/// Created in `Processing` by the submit endpoint, mutated exactly once
/// by the pipeline (the terminal commit), read arbitrarily often by the
/// poll endpoint, never deleted by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Unique job ID, assigned once at submission
    pub id: JobId,

    /// Normalized source URL
    pub source_url: String,

    /// Requested deliverable kind
    #[serde(default)]
    pub deliverable: Deliverable,

    /// Current status
    #[serde(default)]
    pub status: JobStatus,

    /// URL of the derived binary artifact (set on completion)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_url: Option<String>,

    /// Textual result, e.g. summary text (set on completion)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_payload: Option<String>,

    /// Diagnostic string (set on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,

    /// Creation timestamp, immutable
    pub created_at: DateTime<Utc>,
}

impl Job {
    /// Create a new job in `Processing`.
    pub fn new(source_url: impl Into<String>, deliverable: Deliverable) -> Self {
        Self {
            id: JobId::new(),
            source_url: source_url.into(),
            deliverable,
            status: JobStatus::Processing,
            artifact_url: None,
            result_payload: None,
            failure_reason: None,
            created_at: Utc::now(),
        }
    }

    /// Move the job to `Completed` with its result fields.
    ///
    /// Result fields are only ever populated together with this
    /// transition.
    pub fn complete(
        mut self,
        artifact_url: Option<String>,
        result_payload: Option<String>,
    ) -> Self {
        self.status = JobStatus::Completed;
        self.artifact_url = artifact_url;
        self.result_payload = result_payload;
        self
    }

    /// Move the job to `Failed` with a diagnostic.
    pub fn fail(mut self, reason: impl Into<String>) -> Self {
        self.status = JobStatus::Failed;
        self.failure_reason = Some(reason.into());
        self
    }

    /// Whether the job has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
