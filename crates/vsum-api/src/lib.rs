//! Axum HTTP API for the vsum service.
//!
//! Two job endpoints (`POST /api/jobs`, `GET /api/jobs/:job_id`) plus
//! health and metrics. The handlers talk only to the injected job
//! store and queue; pipeline execution happens in the worker pool.

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
