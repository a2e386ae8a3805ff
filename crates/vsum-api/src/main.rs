//! Axum API server binary.
//!
//! Single-process deployment: the HTTP surface and the worker pool
//! share one binary, connected by the in-process job queue.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vsum_api::{create_router, metrics, ApiConfig, AppState};
use vsum_media::YtDlpExtractor;
use vsum_queue::job_channel;
use vsum_storage::R2Client;
use vsum_store::{JobStore, MemoryJobStore};
use vsum_worker::{DemoSummarizer, JobExecutor, JobPipeline, WorkerConfig};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env().add_directive("vsum=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting vsum-api");

    let config = ApiConfig::from_env();
    let worker_config = WorkerConfig::from_env();
    info!(
        "API config: host={}, port={}, queue_capacity={}",
        config.host, config.port, config.queue_capacity
    );

    // Collaborators are constructed here and injected; nothing reaches
    // for globals further down.
    let store: Arc<dyn JobStore> = Arc::new(MemoryJobStore::new());

    let artifacts = match R2Client::from_env() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!("Failed to configure artifact storage: {}", e);
            std::process::exit(1);
        }
    };

    let extractor = match YtDlpExtractor::new() {
        Ok(e) => Arc::new(e),
        Err(e) => {
            error!("Failed to locate extraction tool: {}", e);
            std::process::exit(1);
        }
    };

    let (queue, receiver) = job_channel(config.queue_capacity);

    let pipeline = Arc::new(JobPipeline::new(
        Arc::clone(&store),
        artifacts,
        extractor,
        Arc::new(DemoSummarizer),
        worker_config.clone(),
    ));

    let executor = Arc::new(JobExecutor::new(
        pipeline,
        worker_config.max_concurrent_jobs,
    ));
    let executor_task = {
        let executor = Arc::clone(&executor);
        tokio::spawn(async move { executor.run(receiver).await })
    };

    // Initialize metrics
    let metrics_enabled = std::env::var("METRICS_ENABLED")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(true);

    let metrics_handle = if metrics_enabled {
        info!("Prometheus metrics enabled at /metrics");
        Some(metrics::init_metrics())
    } else {
        None
    };

    let app = create_router(AppState::new(config.clone(), store, queue), metrics_handle);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid bind address");

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    // Stop consuming new jobs and drain the ones in flight.
    executor.shutdown();
    executor_task.await.ok();

    info!("Server shutdown complete");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    info!("Received shutdown signal");
}
