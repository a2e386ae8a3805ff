//! Media error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while invoking the extraction tool.
///
/// The pipeline classifies all of these as extraction failures; the
/// variants keep the distinguishing detail for the diagnostic string.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("extraction tool not found on PATH: {0}")]
    ToolNotFound(String),

    #[error("failed to spawn {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with status {code}; stderr: {stderr_tail}")]
    NonZeroExit {
        tool: String,
        /// Exit code, or -1 when killed by a signal
        code: i32,
        stderr_tail: String,
    },

    #[error("expected output file missing: {}", .0.display())]
    MissingOutput(PathBuf),

    #[error("output file is empty: {}", .0.display())]
    EmptyOutput(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
