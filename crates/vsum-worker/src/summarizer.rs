//! Pluggable summary derivation.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

/// Error from a summary computation.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SummarizeError(pub String);

/// Derives the textual result for summary deliverables.
///
/// The demo implementation stands in for a real transcription and
/// summarization backend; swapping one in must not touch the pipeline.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Produce summary text for the extracted audio.
    async fn summarize(&self, source_url: &str, audio_path: &Path)
        -> Result<String, SummarizeError>;
}

/// Placeholder summarizer returning a fixed demo value.
///
/// A placeholder summary is a valid terminal success, not a failure.
#[derive(Debug, Clone, Default)]
pub struct DemoSummarizer;

impl DemoSummarizer {
    pub const DEMO_SUMMARY: &'static str =
        "Demo summary. Replace with a real summarization pipeline.";
}

#[async_trait]
impl Summarizer for DemoSummarizer {
    async fn summarize(
        &self,
        _source_url: &str,
        _audio_path: &Path,
    ) -> Result<String, SummarizeError> {
        Ok(Self::DEMO_SUMMARY.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_summarizer_always_succeeds() {
        let text = DemoSummarizer
            .summarize("https://example.com/v", Path::new("/tmp/a.mp3"))
            .await
            .unwrap();
        assert_eq!(text, DemoSummarizer::DEMO_SUMMARY);
    }
}
