//! HTTP client for the media server's upload endpoint.

use reqwest::blocking::{multipart, Client};
use reqwest::header::COOKIE;
use reqwest::StatusCode;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while uploading a single file.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("could not read {path} for upload: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not upload {path}: {source}")]
    Request {
        path: PathBuf,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not upload {path}: server returned {status}")]
    Status { path: PathBuf, status: StatusCode },
}

/// Trait for the upload side of the import, so the pipeline can be tested
/// without a running media server.
pub trait MediaUploader: Send + Sync {
    /// Upload a single file, optionally tagged with a track type hint.
    fn upload(&self, path: &Path, track_type: Option<&str>) -> Result<(), UploadError>;
}

/// HTTP client for communicating with the media server.
pub struct HttpUploadClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpUploadClient {
    /// Create a new upload client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the media server (e.g., "https://radio.example.org")
    /// * `api_key` - API key, sent as the basic-auth username with an empty password
    /// * `timeout_sec` - Per-request timeout in seconds
    pub fn new(base_url: String, api_key: String, timeout_sec: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()?;

        // Ensure base_url doesn't have trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Get the base URL of the media server.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl MediaUploader for HttpUploadClient {
    fn upload(&self, path: &Path, track_type: Option<&str>) -> Result<(), UploadError> {
        let url = format!("{}/rest/media", self.base_url);

        // Multipart field "file" carrying the raw bytes and original filename.
        let form = multipart::Form::new()
            .file("file", path)
            .map_err(|source| UploadError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let mut request = self
            .client
            .post(&url)
            .basic_auth(&self.api_key, Some(""))
            .multipart(form);

        // The server reads the track type hint from the tt_upload cookie.
        if let Some(track_type) = track_type {
            request = request.header(COOKIE, format!("tt_upload={}", track_type));
        }

        let response = request.send().map_err(|source| UploadError::Request {
            path: path.to_path_buf(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Status {
                path: path.to_path_buf(),
                status,
            });
        }

        Ok(())
    }
}
