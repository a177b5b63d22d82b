//! reqwest-backed implementation of [`AnalysisTransport`].

use std::time::Duration;

use async_trait::async_trait;
use malscan_core::{FileContent, JobHandle, JobStatus, SubmittedFile};
use malscan_report_contract::{Report, parse_report};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use tracing::{debug, warn};
use url::Url;

use crate::{AnalysisTransport, TransportError, UPLOAD_FAILED_MESSAGE, message_from_body};

const FILES_PATH: [&str; 3] = ["api", "v1", "files"];
const JOBS_PATH: [&str; 3] = ["api", "v1", "jobs"];
const REPORTS_PATH: [&str; 3] = ["api", "v1", "reports"];

/// HTTP client tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpOptions {
    /// Whole-request timeout.
    pub request_timeout: Duration,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Path of the health probe, relative to the base URL.
    pub health_path: String,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            health_path: "/health".to_string(),
        }
    }
}

/// Analysis backend client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: Url,
    health_segments: Vec<String>,
    client: Client,
}

impl HttpTransport {
    /// Creates a client for `base_url`.
    ///
    /// # Errors
    /// Returns [`TransportError::InvalidEndpoint`] when the base URL is not an
    /// absolute `http`/`https` URL, and [`TransportError::Network`] when the
    /// underlying client cannot be built.
    pub fn new(base_url: &str, options: HttpOptions) -> Result<Self, TransportError> {
        let base_url = validate_base_url(base_url)?;

        let client = Client::builder()
            .connect_timeout(options.connect_timeout)
            .timeout(options.request_timeout)
            .user_agent(concat!("malscan/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| TransportError::Network(format!("client setup failed: {error}")))?;

        let health_segments = options
            .health_path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            base_url,
            health_segments,
            client,
        })
    }

    /// Returns the validated base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds an endpoint URL; every segment is percent-encoded.
    ///
    /// # Errors
    /// Returns [`TransportError::InvalidEndpoint`] when the base URL cannot
    /// carry path segments.
    pub fn endpoint<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                TransportError::InvalidEndpoint(format!("{} cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json(&self, url: Url, fallback: &str) -> Result<Vec<u8>, TransportError> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(network_error)?;
        read_success_body(response, fallback).await
    }
}

#[async_trait]
impl AnalysisTransport for HttpTransport {
    async fn submit(&self, file: &SubmittedFile) -> Result<JobHandle, TransportError> {
        let url = self.endpoint(FILES_PATH)?;
        let bytes = match &file.content {
            FileContent::Memory(bytes) => bytes.clone(),
            FileContent::Path(path) => tokio::fs::read(path)
                .await
                .map_err(|error| TransportError::File(format!("{}: {error}", path.display())))?,
        };

        debug!(%url, file_name = %file.name, byte_size = file.byte_size, "POST multipart");
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file.name.clone()));
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(network_error)?;

        let body = read_success_body(response, UPLOAD_FAILED_MESSAGE).await?;
        JobHandle::from_json_bytes(&body).map_err(|error| TransportError::Decode(error.to_string()))
    }

    async fn fetch_status(&self, job_id: &str) -> Result<JobStatus, TransportError> {
        let url = self.endpoint(JOBS_PATH.into_iter().chain([job_id]))?;
        let body = self.get_json(url, "failed to fetch job status").await?;
        JobStatus::from_json_bytes(&body).map_err(|error| TransportError::Decode(error.to_string()))
    }

    async fn fetch_report(&self, job_id: &str) -> Result<Report, TransportError> {
        let url = self.endpoint(REPORTS_PATH.into_iter().chain([job_id]))?;
        let body = self.get_json(url, "failed to fetch report").await?;
        parse_report(&body).map_err(|error| TransportError::Decode(error.to_string()))
    }

    async fn check_health(&self) -> bool {
        let url = match self.endpoint(self.health_segments.iter().map(String::as_str)) {
            Ok(url) => url,
            Err(error) => {
                warn!(%error, "health endpoint unusable");
                return false;
            }
        };

        match self.client.get(url).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                debug!(status = response.status().as_u16(), "health probe rejected");
                false
            }
            Err(error) => {
                debug!(%error, "health probe failed");
                false
            }
        }
    }
}

/// Validates that `base_url` is an absolute `http`/`https` URL.
///
/// Trailing slashes are trimmed before parsing.
///
/// # Errors
/// Returns [`TransportError::InvalidEndpoint`] for unparsable URLs or other
/// schemes.
pub fn validate_base_url(base_url: &str) -> Result<Url, TransportError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed)
        .map_err(|error| TransportError::InvalidEndpoint(format!("{trimmed}: {error}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(TransportError::InvalidEndpoint(format!(
            "{trimmed}: scheme must be http or https"
        )));
    }

    Ok(parsed)
}

async fn read_success_body(response: Response, fallback: &str) -> Result<Vec<u8>, TransportError> {
    let status = response.status();
    let body = response.bytes().await.map_err(network_error)?;

    if status.is_success() {
        return Ok(body.to_vec());
    }

    let message = message_from_body(&body, fallback);
    warn!(status = status.as_u16(), %message, "backend returned error");
    Err(TransportError::Api {
        status: status.as_u16(),
        message,
    })
}

fn network_error(error: reqwest::Error) -> TransportError {
    TransportError::Network(error.to_string())
}
