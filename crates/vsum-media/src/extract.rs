//! Media extraction via yt-dlp.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use vsum_models::Deliverable;

use crate::error::MediaResult;
use crate::runner::{verify_output, ToolRunner};

/// Base name of the extraction output inside a job's work directory.
const OUTPUT_BASE: &str = "extract";

/// Produces a local media file for a source URL.
///
/// One attempt per call; retries are not this layer's concern.
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Extract the deliverable's media into `work_dir`.
    ///
    /// Returns the path of the produced file, which is guaranteed to
    /// exist and be non-empty.
    async fn extract(
        &self,
        url: &str,
        deliverable: Deliverable,
        work_dir: &Path,
    ) -> MediaResult<PathBuf>;
}

/// yt-dlp backed extractor.
#[derive(Debug, Clone)]
pub struct YtDlpExtractor {
    runner: ToolRunner,
}

impl YtDlpExtractor {
    /// Resolve yt-dlp on PATH.
    pub fn new() -> MediaResult<Self> {
        Ok(Self {
            runner: ToolRunner::resolve("yt-dlp")?,
        })
    }

    /// Use an explicit yt-dlp binary (tests, custom installs).
    pub fn with_binary(path: impl Into<PathBuf>) -> Self {
        Self {
            runner: ToolRunner::from_path(path),
        }
    }

    /// Path the extraction is expected to produce.
    pub fn output_path(deliverable: Deliverable, work_dir: &Path) -> PathBuf {
        work_dir.join(format!("{OUTPUT_BASE}.{}", deliverable.extension()))
    }

    /// Build the yt-dlp argument vector for a deliverable.
    ///
    /// `--playlist-items 1` truncates multi-item sources to their first
    /// addressable item. The format specs follow the audio (mp3) and
    /// 720p mp4 profiles of the download routes this service replaces.
    pub fn build_args(url: &str, deliverable: Deliverable, work_dir: &Path) -> Vec<String> {
        let template = work_dir.join(format!("{OUTPUT_BASE}.%(ext)s"));
        let mut args: Vec<String> = match deliverable {
            Deliverable::Audio | Deliverable::Summary => vec![
                "-f".into(),
                "ba".into(),
                "-x".into(),
                "--audio-format".into(),
                "mp3".into(),
                "--audio-quality".into(),
                "5".into(),
            ],
            Deliverable::Video => vec![
                "-f".into(),
                "bv*[height<=720]+ba/b[height<=720]".into(),
                "--merge-output-format".into(),
                "mp4".into(),
                "--postprocessor-args".into(),
                "ffmpeg:-movflags +faststart -preset veryfast -crf 28".into(),
            ],
        };
        args.extend([
            "--playlist-items".into(),
            "1".into(),
            "--no-part".into(),
            "-o".into(),
            template.to_string_lossy().into_owned(),
            url.to_string(),
        ]);
        args
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    async fn extract(
        &self,
        url: &str,
        deliverable: Deliverable,
        work_dir: &Path,
    ) -> MediaResult<PathBuf> {
        let args = Self::build_args(url, deliverable, work_dir);
        debug!(%url, %deliverable, "running yt-dlp");

        self.runner.run_checked(&args).await?;

        let output = Self::output_path(deliverable, work_dir);
        let size = verify_output(&output).await?;
        info!(
            %url,
            path = %output.display(),
            size_bytes = size,
            "extraction finished"
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    #[test]
    fn audio_args_request_mp3_single_item() {
        let dir = Path::new("/tmp/job");
        let args = YtDlpExtractor::build_args(
            "https://example.com/watch?id=abc",
            Deliverable::Audio,
            dir,
        );
        assert!(args.contains(&"-x".to_string()));
        assert!(args.contains(&"mp3".to_string()));
        let pos = args.iter().position(|a| a == "--playlist-items").unwrap();
        assert_eq!(args[pos + 1], "1");
        assert!(args.contains(&"/tmp/job/extract.%(ext)s".to_string()));
        assert_eq!(args.last().unwrap(), "https://example.com/watch?id=abc");
    }

    #[test]
    fn video_args_cap_height_and_force_mp4() {
        let args = YtDlpExtractor::build_args(
            "https://example.com/v",
            Deliverable::Video,
            Path::new("/tmp/job"),
        );
        assert!(args.contains(&"bv*[height<=720]+ba/b[height<=720]".to_string()));
        assert!(args.contains(&"--merge-output-format".to_string()));
        assert!(args.contains(&"mp4".to_string()));
        assert!(args.contains(&"--no-part".to_string()));
    }

    #[test]
    fn summary_extracts_audio() {
        let args = YtDlpExtractor::build_args(
            "https://example.com/v",
            Deliverable::Summary,
            Path::new("/tmp/job"),
        );
        assert!(args.contains(&"--audio-format".to_string()));
    }

    /// Write a fake extraction tool that runs `script` and make it
    /// executable.
    fn fake_tool(dir: &Path, script: &str) -> PathBuf {
        let path = dir.join("fake-yt-dlp");
        std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn extract_returns_output_path_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("extract.mp3");
        let tool = fake_tool(
            dir.path(),
            &format!("printf audio-bytes > {}", out.display()),
        );

        let extractor = YtDlpExtractor::with_binary(tool);
        let produced = extractor
            .extract("https://example.com/v", Deliverable::Audio, dir.path())
            .await
            .unwrap();
        assert_eq!(produced, out);
    }

    #[tokio::test]
    async fn extract_fails_on_nonzero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let tool = fake_tool(dir.path(), "echo nope >&2; exit 1");

        let extractor = YtDlpExtractor::with_binary(tool);
        let err = extractor
            .extract("https://example.com/v", Deliverable::Audio, dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, crate::MediaError::NonZeroExit { code: 1, .. }));
    }

    #[tokio::test]
    async fn extract_fails_when_tool_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let tool = fake_tool(dir.path(), "exit 0");

        let extractor = YtDlpExtractor::with_binary(tool);
        let err = extractor
            .extract("https://example.com/v", Deliverable::Audio, dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, crate::MediaError::MissingOutput(_)));
    }

    #[tokio::test]
    async fn extract_fails_on_empty_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("extract.mp3");
        let tool = fake_tool(dir.path(), &format!("touch {}", out.display()));

        let extractor = YtDlpExtractor::with_binary(tool);
        let err = extractor
            .extract("https://example.com/v", Deliverable::Audio, dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, crate::MediaError::EmptyOutput(_)));
    }
}
