//! Request handlers.

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use super::ServerState;
use crate::pipeline::{ResponseEntry, UploadedFile};

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

/// A request-level failure, rendered as `{"detail": "..."}`.
///
/// Per-file failures never take this path; they are reported inside the
/// batch response with status `failed`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    /// Keep the status axum assigns (e.g. 413 when the body limit is hit).
    pub fn multipart(error: MultipartError) -> Self {
        Self {
            status: error.status(),
            detail: error.body_text(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub sample_rate: u32,
    pub version: &'static str,
}

pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        sample_rate: state.orchestrator.context().sample_rate(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ---------------------------------------------------------------------------
// POST /predict/
// ---------------------------------------------------------------------------

/// Score every uploaded file of a multipart form.
///
/// Each part with a file name becomes one batch item; plain form fields are
/// ignored. The batch runs on the blocking pool.
pub async fn predict(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> Result<Json<Vec<ResponseEntry>>, ApiError> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(ApiError::multipart)?
    {
        let Some(filename) = field.file_name().map(str::to_owned) else {
            log::debug!("predict: skipping form field {:?}", field.name());
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(ApiError::multipart)?;
        files.push(UploadedFile::new(filename, bytes.to_vec()));
    }

    log::info!("Received batch of {} file(s)", files.len());

    let orchestrator = state.orchestrator.clone();
    let report = tokio::task::spawn_blocking(move || orchestrator.process_batch(&files))
        .await
        .map_err(|e| ApiError::internal(format!("batch task failed: {e}")))?;

    Ok(Json(report.into_entries()))
}
