//! Job tracker state and its pure transition function.

use std::fmt::Write as _;

use malscan_core::{JobState, JobStatus, format_megabytes};
use malscan_report_contract::{STAGE_LABELS, STATUS_LABELS};
use malscan_transport::TransportError;

use crate::{BACK_TO_UPLOAD, Route};

/// Shown when a failed job carries no usable error message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Analysis failed";

/// Tracking view state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TrackerState {
    /// No snapshot received yet.
    #[default]
    Loading,
    /// Job waits for a worker.
    Queued(JobStatus),
    /// Job stages are executing.
    Scanning(JobStatus),
    /// Job finished; the report is ready.
    Done(JobStatus),
    /// Job failed on the server.
    Failed {
        /// Final snapshot.
        status: JobStatus,
        /// Server message or [`GENERIC_FAILURE_MESSAGE`].
        message: String,
    },
    /// A status fetch failed.
    Error {
        /// Transport failure message.
        message: String,
        /// Last snapshot received before the failure.
        last_known: Option<JobStatus>,
    },
}

impl TrackerState {
    /// Returns `true` when polling must stop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_) | Self::Failed { .. } | Self::Error { .. })
    }

    /// Returns the most recent snapshot held by this state.
    pub fn last_status(&self) -> Option<&JobStatus> {
        match self {
            Self::Loading => None,
            Self::Queued(status) | Self::Scanning(status) | Self::Done(status) => Some(status),
            Self::Failed { status, .. } => Some(status),
            Self::Error { last_known, .. } => last_known.as_ref(),
        }
    }

    /// Returns the job id whose report may be opened, only in `Done`.
    pub fn report_job_id(&self) -> Option<&str> {
        match self {
            Self::Done(status) => Some(status.job_id.as_str()),
            _ => None,
        }
    }
}

/// Applies one poll outcome.
///
/// Terminal states absorb every further outcome. Snapshots apply in the order
/// their fetches were issued; `updated_at` is never compared.
pub fn transition(state: &TrackerState, outcome: Result<JobStatus, TransportError>) -> TrackerState {
    if state.is_terminal() {
        return state.clone();
    }

    let status = match outcome {
        Ok(status) => status,
        Err(error) => {
            return TrackerState::Error {
                message: error.message(),
                last_known: state.last_status().cloned(),
            };
        }
    };

    match status.status {
        JobState::Queued => TrackerState::Queued(status),
        JobState::Scanning => TrackerState::Scanning(status),
        JobState::Done => TrackerState::Done(status),
        JobState::Failed => {
            let message = status
                .failure_message()
                .unwrap_or(GENERIC_FAILURE_MESSAGE)
                .to_string();
            TrackerState::Failed { status, message }
        }
    }
}

/// File details carried over from the upload view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadContext {
    /// Uploaded file name.
    pub file_name: String,
    /// Uploaded file size in bytes.
    pub file_size: u64,
}

/// Renders the tracking view as plain text.
pub fn render_tracker(
    job_id: &str,
    state: &TrackerState,
    context: Option<&UploadContext>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Job: {job_id}");
    if let Some(context) = context {
        let _ = writeln!(
            out,
            "File: {} ({} MB)",
            context.file_name,
            format_megabytes(context.file_size)
        );
    }

    match state {
        TrackerState::Loading => {
            let _ = writeln!(out, "Status: loading");
        }
        TrackerState::Error {
            message,
            last_known,
        } => {
            if let Some(status) = last_known {
                write_progress(&mut out, status);
            }
            let _ = writeln!(out, "Error: {message}");
            let _ = writeln!(out, "{BACK_TO_UPLOAD}");
        }
        TrackerState::Failed { status, message } => {
            write_progress(&mut out, status);
            let _ = writeln!(out, "Error: {message}");
            let _ = writeln!(out, "{BACK_TO_UPLOAD}");
        }
        TrackerState::Done(status) => {
            write_progress(&mut out, status);
            let _ = writeln!(
                out,
                "Report: {}",
                Route::Report(status.job_id.clone())
            );
        }
        TrackerState::Queued(status) | TrackerState::Scanning(status) => {
            write_progress(&mut out, status);
        }
    }

    out
}

fn write_progress(out: &mut String, status: &JobStatus) {
    let progress = &status.progress;
    let _ = writeln!(out, "Status: {}", STATUS_LABELS.label(status.status.as_str()));
    let _ = writeln!(out, "Progress: {}%", progress.percent);
    if let Some(stage) = progress.current_stage.as_deref() {
        let _ = writeln!(out, "Stage: {}", STAGE_LABELS.label(stage));
    }
    let _ = writeln!(
        out,
        "Stages done: {} / {}",
        progress.stages_done, progress.stages_total
    );
}
