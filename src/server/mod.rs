//! HTTP API server module.
//!
//! Exposes job submission, status, result and cancellation over JSON.

pub mod routes;

pub use routes::{build_router, AppState};

use crate::crawler::Coordinator;
use crate::JobError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Errors returned by API handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),
}

impl From<JobError> for ApiError {
    fn from(error: JobError) -> Self {
        match error {
            JobError::InvalidRequest(_) => Self::BadRequest(error.to_string()),
            JobError::NotFound(_) => Self::NotFound(error.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

/// Serves the API on `bind` until Ctrl+C
pub async fn serve(coordinator: Coordinator, bind: &str) -> crate::Result<()> {
    let router = build_router(coordinator);
    let listener = tokio::net::TcpListener::bind(bind).await?;

    tracing::info!("Crawl API listening on http://{}", listener.local_addr()?);
    tracing::info!("  POST   /            submit a job");
    tracing::info!("  GET    /status/:id  job progress");
    tracing::info!("  GET    /result/:id  job results");
    tracing::info!("  DELETE /jobs/:id    cancel a job");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down gracefully...");
}
