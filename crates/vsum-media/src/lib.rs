//! External media tool invocation.
//!
//! This crate wraps the single external dependency of the pipeline:
//! the media-extraction tool (yt-dlp). [`ToolRunner`] spawns the
//! process and captures its exit status and streams; [`YtDlpExtractor`]
//! builds the per-deliverable argument vector and verifies the output
//! file. The pipeline consumes the [`MediaExtractor`] trait so tests
//! can substitute a fake tool.

pub mod error;
pub mod extract;
pub mod runner;

pub use error::{MediaError, MediaResult};
pub use extract::{MediaExtractor, YtDlpExtractor};
pub use runner::{verify_output, ToolOutput, ToolRunner};
