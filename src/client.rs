//! Client for a running `spoofcheck serve` instance.
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use spoofcheck::client::PredictClient;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = PredictClient::new("http://localhost:8000");
//!     let entries = client
//!         .submit(&[PathBuf::from("a.wav"), PathBuf::from("b.flac")])
//!         .await
//!         .unwrap();
//!     println!("{entries:#}");
//! }
//! ```

use std::path::PathBuf;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use thiserror::Error;

/// Multipart field name every file is sent under.
pub const FILES_FIELD: &str = "files";

// ---------------------------------------------------------------------------
// ClientError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ClientError {
    /// A file to upload could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not JSON.
    #[error("failed to parse response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// PredictClient
// ---------------------------------------------------------------------------

/// Posts local files as one batch to `{base_url}/predict/`.
#[derive(Debug, Clone)]
pub struct PredictClient {
    client: reqwest::Client,
    base_url: String,
}

impl PredictClient {
    /// Batches can take a while on CPU; the default timeout is generous.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, Self::DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn predict_url(&self) -> String {
        format!("{}/predict/", self.base_url.trim_end_matches('/'))
    }

    /// Upload `paths` as a single batch and return the parsed response array.
    pub async fn submit(&self, paths: &[PathBuf]) -> Result<serde_json::Value, ClientError> {
        let mut form = Form::new();
        for path in paths {
            let bytes = tokio::fs::read(path).await.map_err(|source| ClientError::Io {
                path: path.clone(),
                source,
            })?;
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            form = form.part(FILES_FIELD, Part::bytes(bytes).file_name(filename));
        }

        let url = self.predict_url();
        log::info!("Submitting {} file(s) to {url}", paths.len());

        let response = self.client.post(&url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }
}
