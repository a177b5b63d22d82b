//! Upload submission flow.

use malscan_core::SubmittedFile;
use malscan_transport::AnalysisTransport;
use malscan_ui::{HealthState, SkipReason, UploadCoordinator, UploadHandoff};
use tracing::{debug, info, warn};

use crate::{AppError, redact_sensitive};

/// Result of one submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was sent.
    Skipped(SkipReason),
    /// Backend or network rejected the upload; the message is shown inline.
    Rejected(String),
    /// Job created; navigate to its tracking route.
    Accepted(UploadHandoff),
}

/// Submits the coordinator's selected file.
///
/// No request is issued when the coordinator refuses to start (no file,
/// already submitting, or backend offline).
pub async fn submit_selected(
    coordinator: &mut UploadCoordinator,
    transport: &dyn AnalysisTransport,
    health: HealthState,
) -> SubmitOutcome {
    let file = match coordinator.begin_submit(health) {
        Ok(file) => file,
        Err(reason) => {
            debug!(?reason, "submit skipped");
            return SubmitOutcome::Skipped(reason);
        }
    };

    info!(file_name = %file.name, byte_size = file.byte_size, "uploading file");
    let outcome = transport.submit(&file).await;
    if let Err(error) = &outcome {
        warn!(error = %redact_sensitive(&error.message()), "upload failed");
    }

    match coordinator.complete_submit(outcome) {
        Some(handoff) => {
            info!(job_id = %handoff.job.job_id, "job created");
            cross_check_digest(file, &handoff.job.sha256).await;
            SubmitOutcome::Accepted(handoff)
        }
        None => SubmitOutcome::Rejected(coordinator.error().unwrap_or_default().to_string()),
    }
}

/// Computes the lowercase hex sha256 of the file content on the blocking pool.
///
/// # Errors
/// Returns [`AppError::Core`] when a path-backed file cannot be read and
/// [`AppError::Io`] when the blocking task is cancelled.
pub async fn local_sha256(file: SubmittedFile) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || file.sha256_hex())
        .await
        .map_err(|error| AppError::Io(std::io::Error::other(error)))?
        .map_err(AppError::Core)
}

async fn cross_check_digest(file: SubmittedFile, server_sha256: &str) {
    match local_sha256(file).await {
        Ok(local) if local.eq_ignore_ascii_case(server_sha256) => {
            debug!(sha256 = %local, "server digest matches local content");
        }
        Ok(local) => {
            warn!(local = %local, server = %server_sha256, "server digest differs from local content");
        }
        Err(error) => debug!(%error, "local digest unavailable"),
    }
}
