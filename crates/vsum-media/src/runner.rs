//! External tool runner.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use tokio::process::Command;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// How much of stderr is kept in diagnostics.
const STDERR_TAIL_BYTES: usize = 2048;

/// Captured result of one tool invocation.
#[derive(Debug)]
pub struct ToolOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    /// Last portion of stderr, for diagnostics.
    pub fn stderr_tail(&self) -> &str {
        let bytes = self.stderr.as_bytes();
        if bytes.len() <= STDERR_TAIL_BYTES {
            return self.stderr.trim_end();
        }
        let start = bytes.len() - STDERR_TAIL_BYTES;
        // Step forward to a char boundary.
        let mut start = start;
        while !self.stderr.is_char_boundary(start) {
            start += 1;
        }
        self.stderr[start..].trim_end()
    }
}

/// Runs an external executable and captures its outcome.
///
/// Single-attempt semantics: one spawn per call, no internal retries.
/// The call resolves when the process exits; it never blocks past
/// process completion.
#[derive(Debug, Clone)]
pub struct ToolRunner {
    tool: PathBuf,
}

impl ToolRunner {
    /// Resolve a tool by name on PATH.
    pub fn resolve(name: &str) -> MediaResult<Self> {
        let tool = which::which(name).map_err(|_| MediaError::ToolNotFound(name.to_string()))?;
        Ok(Self { tool })
    }

    /// Use an explicit executable path, skipping PATH resolution.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { tool: path.into() }
    }

    /// Name of the wrapped tool, for diagnostics.
    pub fn tool_name(&self) -> String {
        self.tool
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.tool.display().to_string())
    }

    /// Run the tool to completion and capture exit status and streams.
    pub async fn run<I, S>(&self, args: I) -> MediaResult<ToolOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        debug!(tool = %self.tool.display(), "spawning extraction tool");

        let output = Command::new(&self.tool)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| MediaError::Spawn {
                tool: self.tool_name(),
                source,
            })?;

        Ok(ToolOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Run and fail unless the tool exits zero.
    pub async fn run_checked<I, S>(&self, args: I) -> MediaResult<ToolOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let output = self.run(args).await?;
        if !output.status.success() {
            return Err(MediaError::NonZeroExit {
                tool: self.tool_name(),
                code: output.status.code().unwrap_or(-1),
                stderr_tail: output.stderr_tail().to_string(),
            });
        }
        Ok(output)
    }
}

/// Check that the expected output file exists and is non-empty.
///
/// Returns its size in bytes. A missing and an empty file are distinct
/// errors so the diagnostic keeps the difference.
pub async fn verify_output(path: &Path) -> MediaResult<u64> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(MediaError::MissingOutput(path.to_path_buf()))
        }
        Err(e) => return Err(MediaError::Io(e)),
    };
    if metadata.len() == 0 {
        return Err(MediaError::EmptyOutput(path.to_path_buf()));
    }
    Ok(metadata.len())
}
