#![warn(missing_docs)]
//! # malscan-transport
//!
//! ## Purpose
//! Thin client for the analysis backend's HTTP+JSON contract.
//!
//! ## Responsibilities
//! - Define the injectable [`AnalysisTransport`] seam used by every view.
//! - Implement it over HTTP with [`HttpTransport`].
//! - Normalize network, HTTP status, and decode failures into one
//!   [`TransportError`] carrying a human-readable message.
//!
//! ## Data flow
//! Upload view -> [`AnalysisTransport::submit`] -> job handle.
//! Tracking view -> [`AnalysisTransport::fetch_status`] (repeated).
//! Report view -> [`AnalysisTransport::fetch_report`] (once).
//! Health monitor -> [`AnalysisTransport::check_health`] (periodic).
//!
//! ## Error model
//! Non-2xx bodies are unwrapped with [`extract_error_message`], which accepts
//! both the bare `{"error": {...}}` envelope and the framework-wrapped
//! `{"detail": ...}` shape. No operation retries internally; retry policy
//! belongs to callers and is informed by [`classify_transport_error`].

mod http;

use async_trait::async_trait;
use malscan_core::{JobHandle, JobStatus, SubmittedFile};
use malscan_report_contract::Report;
use serde_json::Value;
use thiserror::Error;

pub use http::{HttpOptions, HttpTransport, validate_base_url};

/// Fallback message when a failed upload carries no usable error body.
pub const UPLOAD_FAILED_MESSAGE: &str = "upload failed";

/// Operations offered by the analysis backend.
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    /// Uploads one file and returns the created job handle.
    async fn submit(&self, file: &SubmittedFile) -> Result<JobHandle, TransportError>;

    /// Fetches the current status snapshot of a job.
    async fn fetch_status(&self, job_id: &str) -> Result<JobStatus, TransportError>;

    /// Fetches the final report of a job.
    async fn fetch_report(&self, job_id: &str) -> Result<Report, TransportError>;

    /// Returns `true` when the backend answered its health probe with 2xx.
    ///
    /// Never fails: any network or status problem resolves to `false`.
    async fn check_health(&self) -> bool;
}

/// Extracts a human-readable message from an error response body.
///
/// Lookup order: `detail.error.message`, `detail.message`, `error.message`,
/// then `detail` itself. Blank strings are skipped. Returns `None` when
/// nothing usable is present so callers can apply their own fallback.
pub fn extract_error_message(body: &Value) -> Option<String> {
    let candidates = [
        &body["detail"]["error"]["message"],
        &body["detail"]["message"],
        &body["error"]["message"],
    ];

    if let Some(message) = candidates
        .into_iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|message| !message.is_empty())
    {
        return Some(message.to_string());
    }

    match &body["detail"] {
        Value::Null | Value::Bool(false) => None,
        Value::String(detail) if detail.trim().is_empty() => None,
        Value::String(detail) => Some(detail.trim().to_string()),
        other => Some(other.to_string()),
    }
}

/// Extracts a message from raw response bytes, falling back to `fallback`.
pub fn message_from_body(raw: &[u8], fallback: &str) -> String {
    serde_json::from_slice::<Value>(raw)
        .ok()
        .as_ref()
        .and_then(extract_error_message)
        .unwrap_or_else(|| fallback.to_string())
}

/// Coarse failure class used by callers deciding whether to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Retrying later may succeed.
    Retriable,
    /// Retrying will not help.
    Permanent,
}

/// Classifies a transport error.
pub fn classify_transport_error(error: &TransportError) -> FailureClass {
    match error {
        TransportError::Network(_) => FailureClass::Retriable,
        TransportError::Api { status, .. } if *status == 408 || *status == 429 => {
            FailureClass::Retriable
        }
        TransportError::Api { status, .. } if *status >= 500 => FailureClass::Retriable,
        _ => FailureClass::Permanent,
    }
}

/// Normalized transport failure. `Display` yields the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Backend unreachable, connection reset, or timeout.
    #[error("network error: {0}")]
    Network(String),
    /// Backend answered with a non-2xx status.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error body.
        message: String,
    },
    /// Backend answered 2xx with a body that violates the contract.
    #[error("malformed response: {0}")]
    Decode(String),
    /// Local file content could not be read for upload.
    #[error("cannot read file: {0}")]
    File(String),
    /// Base URL or endpoint path is unusable.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl TransportError {
    /// Returns the message shown to the user.
    pub fn message(&self) -> String {
        self.to_string()
    }
}
