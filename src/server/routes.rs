//! Axum HTTP routes for the crawl job API.

use crate::crawler::{Coordinator, JobRequest};
use crate::server::ApiError;
use crate::state::{JobId, JobOutcome};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Coordinator,
}

// ─── Route builder ───────────────────────────────────────────────

pub fn build_router(coordinator: Coordinator) -> Router {
    Router::new()
        .route("/", post(create_job))
        .route("/jobs", post(create_job))
        .route("/jobs/:job_id", delete(cancel_job))
        .route("/status/:job_id", get(job_status))
        .route("/result/:job_id", get(job_result))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { coordinator })
}

// ─── Handlers ────────────────────────────────────────────────────

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "jobs": state.coordinator.registry().len(),
    }))
}

/// Request body for submitting a crawl job
#[derive(Debug, Deserialize)]
struct CreateJobBody {
    urls: Option<Vec<String>>,
    threads: Option<usize>,
    levels: Option<u32>,
}

async fn create_job(
    State(state): State<AppState>,
    body: Result<Json<CreateJobBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let urls = body
        .urls
        .ok_or_else(|| ApiError::BadRequest("Missing url list node".to_string()))?;

    let submitted = state.coordinator.submit(JobRequest {
        urls,
        workers: body.threads,
        max_depth: body.levels,
    })?;

    Ok(Json(serde_json::json!({
        "job_id": submitted.id,
        "threads": submitted.workers,
        "levels": submitted.max_depth,
        "urls": submitted.urls,
    })))
}

async fn job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_job_id(&job_id)?;
    Ok(Json(state.coordinator.status(&id)?))
}

async fn job_result(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_job_id(&job_id)?;
    let response = match state.coordinator.result(&id)? {
        JobOutcome::Ready(report) => (StatusCode::OK, Json(report)).into_response(),
        JobOutcome::Pending => (
            StatusCode::ACCEPTED,
            Json(serde_json::json!({ "status": "pending" })),
        )
            .into_response(),
    };
    Ok(response)
}

async fn cancel_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_job_id(&job_id)?;
    state.coordinator.cancel(&id)?;
    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "job_id": id, "status": "cancelling" })),
    ))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": 404, "text": "Page not found" })),
    )
}

/// Malformed identifiers can never name a job, so they are reported as missing
fn parse_job_id(raw: &str) -> Result<JobId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(format!("Job not found: {}", raw)))
}
