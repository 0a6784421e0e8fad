//! HTTP front end.
//!
//! Routes:
//!
//! | Method | Path        | Handler                      |
//! |--------|-------------|------------------------------|
//! | POST   | `/predict/` | [`handlers::predict`]        |
//! | POST   | `/predict`  | [`handlers::predict`]        |
//! | GET    | `/health`   | [`handlers::health`]         |

pub mod handlers;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::config::ServerConfig;
use crate::pipeline::{ModelContext, PipelineOrchestrator};

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct ServerState {
    pub orchestrator: PipelineOrchestrator,
}

/// Build the application router around a loaded model context.
pub fn build_router(context: Arc<ModelContext>, max_upload_bytes: usize) -> Router {
    let state = ServerState {
        orchestrator: PipelineOrchestrator::new(context),
    };

    Router::new()
        .route("/predict/", post(handlers::predict))
        .route("/predict", post(handlers::predict))
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
}

/// Bind `config.bind_addr()` and serve until the process is stopped.
pub async fn run(config: &ServerConfig, context: Arc<ModelContext>) -> Result<()> {
    let app = build_router(context, config.max_upload_bytes());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    log::info!("Listening on http://{addr}");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::fixtures::constant_wav;
    use crate::audio::Waveform;
    use crate::model::MockClassifier;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::util::ServiceExt; // for `oneshot`

    const BOUNDARY: &str = "spoofcheck-test-boundary";

    fn app(max_upload_bytes: usize) -> Router {
        let classifier = MockClassifier::from_fn(|w: &Waveform| {
            let mean = w.samples().iter().sum::<f32>() / w.len() as f32;
            Ok(vec![0.0, 10.0 * mean])
        });
        build_router(
            Arc::new(ModelContext::new(Arc::new(classifier), 16_000)),
            max_upload_bytes,
        )
    }

    /// Hand-rolled `multipart/form-data` body: `(field, filename, bytes)`.
    fn multipart_body(parts: &[(&str, Option<&str>, Vec<u8>)]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, filename, bytes) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match filename {
                Some(f) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn predict_request(uri: &str, body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn extract_json(body: Body) -> Value {
        let bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .expect("Should read body");
        serde_json::from_slice(&bytes).expect("Should parse JSON")
    }

    #[tokio::test]
    async fn health_reports_sample_rate() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app(1 << 20).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = extract_json(response.into_body()).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["sample_rate"], 16_000);
    }

    #[tokio::test]
    async fn predict_scores_batch_and_appends_eer() {
        let body = multipart_body(&[
            ("files", Some("genuine.wav"), constant_wav(-0.2, 1_600, 16_000)),
            ("files", Some("spoof.wav"), constant_wav(0.3, 1_600, 16_000)),
            ("files", Some("notes.txt"), b"hello".to_vec()),
        ]);
        let response = app(1 << 20)
            .oneshot(predict_request("/predict/", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = extract_json(response.into_body()).await;
        let entries = body.as_array().expect("array");
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0]["label"], "Genuine");
        assert_eq!(entries[1]["label"], "Spoof");
        assert_eq!(entries[2]["status"], "failed");
        assert!(entries[2]["error"]
            .as_str()
            .unwrap()
            .contains("Only .wav and .flac"));
        assert!(entries[3]["EER"].is_string());
        assert!(entries[3]["threshold"].is_number());
    }

    #[tokio::test]
    async fn predict_without_trailing_slash_is_routed() {
        let body = multipart_body(&[("files", Some("a.wav"), constant_wav(-0.1, 800, 16_000))]);
        let response = app(1 << 20)
            .oneshot(predict_request("/predict", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = extract_json(response.into_body()).await;
        assert_eq!(body.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn plain_form_fields_are_ignored() {
        let body = multipart_body(&[
            ("comment", None, b"batch 7".to_vec()),
            ("files", Some("a.wav"), constant_wav(0.2, 800, 16_000)),
        ]);
        let response = app(1 << 20)
            .oneshot(predict_request("/predict/", body))
            .await
            .unwrap();

        let body = extract_json(response.into_body()).await;
        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["filename"], "a.wav");
    }

    #[tokio::test]
    async fn non_multipart_request_is_rejected() {
        let request = Request::builder()
            .method("POST")
            .uri("/predict/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let response = app(1 << 20).oneshot(request).await.unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let body = multipart_body(&[("files", Some("big.wav"), constant_wav(0.1, 16_000, 16_000))]);
        let response = app(1_024)
            .oneshot(predict_request("/predict/", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = extract_json(response.into_body()).await;
        assert!(body["detail"].is_string());
    }
}
