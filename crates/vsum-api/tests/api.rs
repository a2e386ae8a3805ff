//! HTTP surface tests: submit/poll contract against a live in-process
//! worker pool with fake extraction and storage.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use vsum_api::{create_router, ApiConfig, AppState};
use vsum_media::{MediaError, MediaExtractor, MediaResult};
use vsum_models::Deliverable;
use vsum_queue::job_channel;
use vsum_storage::{ArtifactStore, StorageResult};
use vsum_store::{JobStore, MemoryJobStore};
use vsum_worker::{DemoSummarizer, JobExecutor, JobPipeline, WorkerConfig};

#[derive(Clone, Copy)]
enum ExtractorMode {
    Produce,
    ExitNonZero,
}

struct FakeExtractor {
    mode: ExtractorMode,
}

#[async_trait]
impl MediaExtractor for FakeExtractor {
    async fn extract(
        &self,
        _url: &str,
        deliverable: Deliverable,
        work_dir: &Path,
    ) -> MediaResult<PathBuf> {
        match self.mode {
            ExtractorMode::Produce => {
                let out = work_dir.join(format!("extract.{}", deliverable.extension()));
                tokio::fs::write(&out, b"media-bytes").await?;
                Ok(out)
            }
            ExtractorMode::ExitNonZero => Err(MediaError::NonZeroExit {
                tool: "yt-dlp".into(),
                code: 1,
                stderr_tail: "ERROR: unavailable".into(),
            }),
        }
    }
}

struct CdnArtifactStore;

#[async_trait]
impl ArtifactStore for CdnArtifactStore {
    async fn upload(&self, _: &Path, key: &str, _: &str) -> StorageResult<String> {
        Ok(format!("https://cdn.example/{key}"))
    }
}

struct TestApp {
    router: Router,
    store: Arc<MemoryJobStore>,
    _scratch: tempfile::TempDir,
}

/// Build the router; when `run_executor` is false, submitted jobs stay
/// queued so `processing` states can be observed deterministically.
fn test_app(mode: ExtractorMode, run_executor: bool, queue_capacity: usize) -> TestApp {
    let scratch = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryJobStore::new());

    let (queue, receiver) = job_channel(queue_capacity);

    if run_executor {
        let pipeline = Arc::new(JobPipeline::new(
            Arc::clone(&store) as Arc<dyn JobStore>,
            Arc::new(CdnArtifactStore),
            Arc::new(FakeExtractor { mode }),
            Arc::new(DemoSummarizer),
            WorkerConfig {
                work_dir: scratch.path().to_path_buf(),
                max_concurrent_jobs: 2,
                job_timeout: Duration::from_secs(10),
            },
        ));
        let executor = JobExecutor::new(pipeline, 2);
        tokio::spawn(async move { executor.run(receiver).await });
    } else {
        // Keep the receiver alive so the queue does not read as closed.
        std::mem::forget(receiver);
    }

    let config = ApiConfig::default();
    let state = AppState::new(config, Arc::clone(&store) as Arc<dyn JobStore>, queue);
    TestApp {
        router: create_router(state, None),
        store,
        _scratch: scratch,
    }
}

async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Poll until `ready` or the deadline passes.
async fn poll_until_ready(router: &Router, job_id: &str) -> Value {
    let uri = format!("/api/jobs/{job_id}");
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let (status, body) = get_json(router, &uri).await;
        assert_eq!(status, StatusCode::OK);
        if body["ready"] == Value::Bool(true) {
            return body;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "job {job_id} never reached a terminal state"
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn submit_returns_job_id_and_immediate_poll_is_pending() {
    let app = test_app(ExtractorMode::Produce, false, 8);

    let (status, body) = post_json(
        &app.router,
        "/api/jobs",
        serde_json::json!({"url": "https://example.com/watch?id=abc&t=10", "deliverable": "audio"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let job_id = body["jobId"].as_str().unwrap().to_string();

    // Record exists, normalized, in processing, before any worker ran.
    let job = app
        .store
        .get(&vsum_models::JobId::from_string(job_id.clone()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(job.source_url, "https://example.com/watch?id=abc");
    assert_eq!(job.status, vsum_models::JobStatus::Processing);

    let (status, body) = get_json(&app.router, &format!("/api/jobs/{job_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"ready": false}));
}

#[tokio::test]
async fn invalid_url_is_rejected_before_any_side_effect() {
    let app = test_app(ExtractorMode::Produce, false, 8);

    for bad in ["", "not a url", "ftp://example.com/file"] {
        let (status, body) = post_json(
            &app.router,
            "/api/jobs",
            serde_json::json!({"url": bad}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "input: {bad:?}");
        assert!(body["error"].is_string());
    }

    assert!(app.store.is_empty().await, "no job may be created");
}

#[tokio::test]
async fn poll_unknown_job_reads_as_pending() {
    let app = test_app(ExtractorMode::Produce, false, 8);

    let (status, body) = get_json(&app.router, "/api/jobs/no-such-job").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"ready": false}));
}

#[tokio::test]
async fn audio_job_completes_end_to_end() {
    let app = test_app(ExtractorMode::Produce, true, 8);

    let (status, body) = post_json(
        &app.router,
        "/api/jobs",
        serde_json::json!({"url": "https://example.com/watch?id=abc", "deliverable": "audio"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let job_id = body["jobId"].as_str().unwrap();

    let body = poll_until_ready(&app.router, job_id).await;
    assert_eq!(body["status"], "completed");
    assert_eq!(
        body["artifactUrl"],
        format!("https://cdn.example/artifacts/{job_id}.mp3")
    );
    assert!(body.get("failureReason").is_none());
}

#[tokio::test]
async fn summary_job_completes_with_payload() {
    let app = test_app(ExtractorMode::Produce, true, 8);

    let (_, body) = post_json(
        &app.router,
        "/api/jobs",
        serde_json::json!({"url": "https://example.com/watch?id=abc"}),
    )
    .await;
    let job_id = body["jobId"].as_str().unwrap();

    let body = poll_until_ready(&app.router, job_id).await;
    assert_eq!(body["status"], "completed");
    assert_eq!(body["resultPayload"], DemoSummarizer::DEMO_SUMMARY);
}

#[tokio::test]
async fn failed_extraction_surfaces_as_terminal_failure() {
    let app = test_app(ExtractorMode::ExitNonZero, true, 8);

    let (_, body) = post_json(
        &app.router,
        "/api/jobs",
        serde_json::json!({"url": "https://example.com/watch?id=abc", "deliverable": "video"}),
    )
    .await;
    let job_id = body["jobId"].as_str().unwrap();

    let body = poll_until_ready(&app.router, job_id).await;
    assert_eq!(body["status"], "failed");
    let reason = body["failureReason"].as_str().unwrap();
    assert!(reason.starts_with("ExtractionFailed"), "reason: {reason}");
    assert!(body.get("artifactUrl").is_none());
}

#[tokio::test]
async fn repeated_polls_after_terminal_state_are_identical() {
    let app = test_app(ExtractorMode::Produce, true, 8);

    let (_, body) = post_json(
        &app.router,
        "/api/jobs",
        serde_json::json!({"url": "https://example.com/watch?id=abc", "deliverable": "audio"}),
    )
    .await;
    let job_id = body["jobId"].as_str().unwrap().to_string();

    let first = poll_until_ready(&app.router, &job_id).await;
    for _ in 0..3 {
        let (_, again) = get_json(&app.router, &format!("/api/jobs/{job_id}")).await;
        assert_eq!(first, again);
    }
}

#[tokio::test]
async fn full_queue_rejects_submission_without_orphaning_the_record() {
    // Capacity 1, no executor: the second submission cannot be queued.
    let app = test_app(ExtractorMode::Produce, false, 1);

    let (status, _) = post_json(
        &app.router,
        "/api/jobs",
        serde_json::json!({"url": "https://example.com/watch?id=one"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(
        &app.router,
        "/api/jobs",
        serde_json::json!({"url": "https://example.com/watch?id=two"}),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].is_string());

    // The rejected submission's record is terminal, not stuck processing.
    let jobs = app.store.all().await;
    assert_eq!(jobs.len(), 2);
    let rejected: Vec<_> = jobs
        .iter()
        .filter(|j| j.status == vsum_models::JobStatus::Failed)
        .collect();
    assert_eq!(rejected.len(), 1);
    assert!(rejected[0]
        .failure_reason
        .as_deref()
        .unwrap()
        .starts_with("QueueRejected"));
}
