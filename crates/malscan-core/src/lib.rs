#![warn(missing_docs)]
//! # malscan-core
//!
//! ## Purpose
//! Defines the pure data model shared across the `malscan` client workspace.
//!
//! ## Responsibilities
//! - Represent the user-selected file and enforce the upload size ceiling.
//! - Represent the job handle returned by submission.
//! - Represent polled job status snapshots and their lifecycle states.
//!
//! ## Data flow
//! The UI selects a [`SubmittedFile`] -> transport uploads it and returns a
//! [`JobHandle`] -> the tracker polls [`JobStatus`] snapshots until one of
//! them reports a terminal [`JobState`].
//!
//! ## Ownership and lifetimes
//! All values own their buffers and strings. Status snapshots are replaced
//! wholesale on every poll and are never mutated in place.
//!
//! ## Error model
//! Local validation failures return [`ValidationError`]; decode and file
//! access failures return [`CoreError`].
//!
//! ## Example
//! ```rust
//! use malscan_core::{MAX_UPLOAD_BYTES, SubmittedFile, validate_upload_size};
//!
//! let file = SubmittedFile::from_bytes("sample.bin", vec![0; 16]);
//! assert!(validate_upload_size(file.byte_size).is_ok());
//! assert!(validate_upload_size(MAX_UPLOAD_BYTES + 1).is_err());
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Upload size ceiling in bytes (20 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;

/// Backing storage for a selected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    /// Bytes already held in memory (drag-and-drop payloads, tests).
    Memory(Vec<u8>),
    /// File on disk, read only when the upload is actually sent.
    Path(PathBuf),
}

/// Client-held reference to a user-chosen file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedFile {
    /// File name sent as the multipart file name.
    pub name: String,
    /// Size in bytes, known before any content is read.
    pub byte_size: u64,
    /// Raw content handle.
    pub content: FileContent,
}

impl SubmittedFile {
    /// Creates a file reference from in-memory bytes.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            byte_size: bytes.len() as u64,
            content: FileContent::Memory(bytes),
        }
    }

    /// Creates a file reference from a path using filesystem metadata only.
    ///
    /// # Errors
    /// Returns [`CoreError::Io`] when metadata cannot be read or the path is
    /// not a regular file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|error| CoreError::Io {
            path: path.display().to_string(),
            source: error,
        })?;

        if !metadata.is_file() {
            return Err(CoreError::Io {
                path: path.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
            });
        }

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.bin".to_string());

        Ok(Self {
            name,
            byte_size: metadata.len(),
            content: FileContent::Path(path.to_path_buf()),
        })
    }

    /// Loads the full file content.
    ///
    /// # Errors
    /// Returns [`CoreError::Io`] when a path-backed file cannot be read.
    pub fn read_bytes(&self) -> Result<Vec<u8>, CoreError> {
        match &self.content {
            FileContent::Memory(bytes) => Ok(bytes.clone()),
            FileContent::Path(path) => std::fs::read(path).map_err(|error| CoreError::Io {
                path: path.display().to_string(),
                source: error,
            }),
        }
    }

    /// Computes the lowercase hex sha256 digest of the content.
    ///
    /// # Errors
    /// Returns [`CoreError::Io`] when a path-backed file cannot be read.
    pub fn sha256_hex(&self) -> Result<String, CoreError> {
        let bytes = self.read_bytes()?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }
}

/// Formats a byte count as megabytes with two decimals.
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / 1024.0 / 1024.0)
}

/// Validates a candidate size against [`MAX_UPLOAD_BYTES`].
///
/// # Errors
/// Returns [`ValidationError::FileTooLarge`] when `byte_size` exceeds the
/// ceiling. A size exactly at the ceiling is accepted.
pub fn validate_upload_size(byte_size: u64) -> Result<(), ValidationError> {
    if byte_size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::FileTooLarge {
            actual_bytes: byte_size,
            limit_bytes: MAX_UPLOAD_BYTES,
        });
    }
    Ok(())
}

/// Handle returned by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    /// Server-assigned job identifier.
    pub job_id: String,
    /// Server-assigned file identifier.
    pub file_id: String,
    /// Server-computed sha256 hex digest of the uploaded content.
    pub sha256: String,
    /// Initial job status (normally `queued`).
    pub status: JobState,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl JobHandle {
    /// Deserializes and validates a submission response.
    ///
    /// # Errors
    /// Returns [`CoreError::Codec`] for invalid JSON and
    /// [`CoreError::InvalidContract`] when `job_id` is blank.
    pub fn from_json_bytes(raw: &[u8]) -> Result<Self, CoreError> {
        let handle: Self = serde_json::from_slice(raw).map_err(CoreError::Codec)?;
        if handle.job_id.trim().is_empty() {
            return Err(CoreError::InvalidContract("job_id is empty".to_string()));
        }
        Ok(handle)
    }
}

/// Server-side lifecycle state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    /// Waiting for a worker.
    Queued,
    /// Stages are executing.
    Scanning,
    /// All stages finished and a report is available.
    Done,
    /// The job failed on the server.
    Failed,
}

impl JobState {
    /// Returns the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Scanning => "scanning",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// Returns `true` for states after which polling must stop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress block of a job status snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobProgress {
    /// Stage currently executing, absent between stages.
    #[serde(default)]
    pub current_stage: Option<String>,
    /// Number of completed stages.
    pub stages_done: u32,
    /// Total number of stages.
    pub stages_total: u32,
    /// Server-reported completion percentage, used verbatim.
    pub percent: u32,
}

/// Polled snapshot of job execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    /// Job identifier.
    pub job_id: String,
    /// Lifecycle state.
    pub status: JobState,
    /// Stage progress.
    pub progress: JobProgress,
    /// Last server-side update.
    pub updated_at: DateTime<Utc>,
    /// Server-supplied failure message.
    #[serde(default)]
    pub error_message: Option<String>,
}

impl JobStatus {
    /// Deserializes and validates a status snapshot.
    ///
    /// # Errors
    /// Returns [`CoreError::Codec`] for invalid JSON and
    /// [`CoreError::InvalidContract`] when `job_id` is blank.
    pub fn from_json_bytes(raw: &[u8]) -> Result<Self, CoreError> {
        let status: Self = serde_json::from_slice(raw).map_err(CoreError::Codec)?;
        if status.job_id.trim().is_empty() {
            return Err(CoreError::InvalidContract("job_id is empty".to_string()));
        }
        Ok(status)
    }

    /// Returns the failure message when present and non-blank.
    pub fn failure_message(&self) -> Option<&str> {
        self.error_message
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }
}

fn whole_megabytes(bytes: &u64) -> u64 {
    bytes / 1024 / 1024
}

fn megabytes_label(bytes: &u64) -> String {
    format_megabytes(*bytes)
}

/// Local pre-submission validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Candidate file exceeds the upload ceiling.
    #[error(
        "file size exceeds the {limit} MB limit (actual: {actual} MB)",
        limit = whole_megabytes(.limit_bytes),
        actual = megabytes_label(.actual_bytes)
    )]
    FileTooLarge {
        /// Candidate size in bytes.
        actual_bytes: u64,
        /// Ceiling in bytes.
        limit_bytes: u64,
    },
}

/// Error type for data model decode and file access failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Filesystem access failed.
    #[error("cannot read '{path}': {source}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// JSON decoding failure.
    #[error("payload codec failure: {0}")]
    Codec(#[from] serde_json::Error),
    /// Decoded payload violates contract invariants.
    #[error("contract violation: {0}")]
    InvalidContract(String),
}
